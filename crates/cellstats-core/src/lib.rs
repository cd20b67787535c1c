pub mod aggregate;
pub mod channel;
pub mod config;
pub mod consts;
pub mod detection;
pub mod error;
pub mod frame;
pub mod index;
pub mod io;
pub mod measure;
pub mod overlay;
pub mod pipeline;
pub mod preprocess;
