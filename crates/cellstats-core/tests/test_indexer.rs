#[allow(dead_code)]
mod common;

use std::cmp::Ordering;
use std::path::PathBuf;

use cellstats_core::channel::ChannelRole;
use cellstats_core::config::{NamingConvention, TokenIndices};
use cellstats_core::error::CellStatsError;
use cellstats_core::frame::Slot;
use cellstats_core::index::naming::ChannelLabels;
use cellstats_core::index::{
    index_directory, list_images, natural_cmp, sort_nicely, NamingScheme, PositionalScheme,
    TokenScheme,
};
use tempfile::TempDir;

fn two_channel_config(dir: &TempDir) -> cellstats_core::config::AnalysisConfig {
    common::png_config(
        dir.path(),
        &dir.path().join("out"),
        vec![ChannelRole::Brightfield, ChannelRole::Blue],
        40,
    )
}

#[test]
fn test_sort_nicely_numeric_chunks() {
    let mut names = vec!["z2", "z10", "z1"];
    sort_nicely(&mut names);
    assert_eq!(names, vec!["z1", "z2", "z10"]);
}

#[test]
fn test_natural_cmp_text_prefix_dominates() {
    assert_eq!(natural_cmp("a10", "b2"), Ordering::Less);
    assert_eq!(natural_cmp("plate_A2_ch01", "plate_A10_ch00"), Ordering::Less);
}

#[test]
fn test_natural_cmp_leading_zeros() {
    assert_eq!(natural_cmp("t01", "t1"), "t01".cmp("t1"));
    assert_eq!(natural_cmp("t002", "t10"), Ordering::Less);
}

#[test]
fn test_natural_cmp_huge_numbers() {
    assert_eq!(
        natural_cmp(
            "x987654321098765432109876543210",
            "x1234567890123456789012345678901"
        ),
        Ordering::Less
    );
}

#[test]
fn test_list_images_filters_extension_and_sorts() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_t10_ch00.png");
    common::touch(dir.path(), "exp_A1_t2_ch00.png");
    common::touch(dir.path(), "notes.txt");
    let config = two_channel_config(&dir);

    let files = list_images(&config).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["exp_A1_t2_ch00.png", "exp_A1_t10_ch00.png"]);
}

#[test]
fn test_no_images_is_fatal() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "readme.md");
    let err = index_directory(&two_channel_config(&dir)).unwrap_err();
    assert!(matches!(err, CellStatsError::NoImages { .. }));
}

#[test]
fn test_wells_grouped_and_sorted() {
    let dir = TempDir::new().unwrap();
    for well in ["A10", "A2", "B1"] {
        common::touch(dir.path(), &format!("plate_{well}_ch00.png"));
        common::touch(dir.path(), &format!("plate_{well}_ch01.png"));
    }
    let wells = index_directory(&two_channel_config(&dir)).unwrap();
    let names: Vec<_> = wells.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["A2", "A10", "B1"]);
    assert!(wells.iter().all(|w| w.files.len() == 2));
    assert_eq!(wells[0].descriptor, "plate_A2");
}

#[test]
fn test_allow_list_filters_wells() {
    let dir = TempDir::new().unwrap();
    for well in ["A1", "B2"] {
        common::touch(dir.path(), &format!("plate_{well}_ch00.png"));
        common::touch(dir.path(), &format!("plate_{well}_ch01.png"));
    }
    let mut config = two_channel_config(&dir);
    config.well_names = vec!["B2".into()];
    let wells = index_directory(&config).unwrap();
    assert_eq!(wells.len(), 1);
    assert_eq!(wells[0].name, "B2");
}

#[test]
fn test_grid_offsets_time_and_ranks_z() {
    let dir = TempDir::new().unwrap();
    for t in [3, 4] {
        for z in [5, 9] {
            for ch in 0..2 {
                common::touch(dir.path(), &format!("exp_A1_t{t}_z{z}_ch0{ch}.png"));
            }
        }
    }
    let config = two_channel_config(&dir);
    let wells = index_directory(&config).unwrap();
    let grid = wells[0].build_grid(&config).unwrap();

    assert_eq!(grid.dims(), (2, 2, 2));
    let path = grid.get(Slot::new(1, 1, 0)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "exp_A1_t3_z9_ch01.png"
    );
    assert_eq!(grid.slots().count(), 8);
}

#[test]
fn test_duplicate_slot_is_fatal() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_ch00.png");
    common::touch(dir.path(), "exp_A1_ch01.png");
    common::touch(dir.path(), "exp_A1_copy_ch01.png");
    let config = two_channel_config(&dir);
    let wells = index_directory(&config).unwrap();
    let err = wells[0].build_grid(&config).unwrap_err();
    match err {
        CellStatsError::DuplicateSlot { well, slot, .. } => {
            assert_eq!(well, "A1");
            assert_eq!(slot, Slot::new(1, 0, 0));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_image_is_fatal_for_analysed_channel() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_t0_ch00.png");
    common::touch(dir.path(), "exp_A1_t0_ch01.png");
    common::touch(dir.path(), "exp_A1_t1_ch00.png");
    let config = two_channel_config(&dir);
    let wells = index_directory(&config).unwrap();
    let err = wells[0].build_grid(&config).unwrap_err();
    assert!(matches!(
        err,
        CellStatsError::MissingImage { slot, .. } if slot == Slot::new(1, 0, 1)
    ));
}

#[test]
fn test_missing_image_of_skipped_channel_is_fine() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_t0_ch00.png");
    common::touch(dir.path(), "exp_A1_t0_ch01.png");
    common::touch(dir.path(), "exp_A1_t1_ch00.png");
    let mut config = two_channel_config(&dir);
    config.channel_labels = vec![ChannelRole::Brightfield, ChannelRole::Skip];
    let wells = index_directory(&config).unwrap();
    let grid = wells[0].build_grid(&config).unwrap();
    assert!(grid.get(Slot::new(1, 0, 1)).is_none());
}

#[test]
fn test_channel_beyond_count_is_fatal() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_ch00.png");
    common::touch(dir.path(), "exp_A1_ch01.png");
    common::touch(dir.path(), "exp_A1_ch02.png");
    let config = two_channel_config(&dir);
    let wells = index_directory(&config).unwrap();
    let err = wells[0].build_grid(&config).unwrap_err();
    assert!(matches!(err, CellStatsError::UnrecognizedFileName { .. }));
}

#[test]
fn test_channel_label_token() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_A1_Brightfield.png");
    common::touch(dir.path(), "exp_A1_blue.png");
    let config = two_channel_config(&dir);
    let wells = index_directory(&config).unwrap();
    let grid = wells[0].build_grid(&config).unwrap();
    let blue: PathBuf = grid.get(Slot::new(1, 0, 0)).unwrap().to_path_buf();
    assert!(blue.ends_with("exp_A1_blue.png"));
}

#[test]
fn test_positional_scheme_without_indices_fails_fast() {
    let dir = TempDir::new().unwrap();
    common::touch(dir.path(), "exp_1_2_3.png");
    let mut config = two_channel_config(&dir);
    config.naming = NamingConvention::Positional;
    let err = index_directory(&config).unwrap_err();
    assert!(matches!(err, CellStatsError::MissingTokenIndex("well")));

    config.token_indices = TokenIndices {
        well: vec![1],
        channel: Some(2),
        ..Default::default()
    };
    let wells = index_directory(&config).unwrap();
    assert_eq!(wells[0].name, "1");
}

fn auto() -> TokenScheme {
    TokenScheme::new(TokenIndices::default(), ChannelLabels::default()).unwrap()
}

#[test]
fn test_token_scheme_parses_leica_name() {
    let parsed = auto().parse("plate1_Aug28_A1_S001_t02_z01_ch03.tif").unwrap();
    assert_eq!(parsed.well, "A1");
    assert_eq!(parsed.descriptor, "plate1_Aug28_A1_S001");
    assert_eq!(parsed.time, Some(2));
    assert_eq!(parsed.z, Some(1));
    assert_eq!(parsed.channel, Some(3));
}

#[test]
fn test_token_scheme_missing_axes_are_none() {
    let parsed = auto().parse("exp_B12_ch00.tif").unwrap();
    assert_eq!(parsed.well, "B12");
    assert_eq!(parsed.time, None);
    assert_eq!(parsed.z, None);
    assert_eq!(parsed.descriptor, "exp_B12");
}

#[test]
fn test_token_scheme_left_most_well_and_pos_tokens() {
    assert_eq!(auto().parse("run_C3_D4_ch01.tif").unwrap().well, "C3");
    let parsed = auto().parse("scan_Pos7_t0_ch1.png").unwrap();
    assert_eq!(parsed.well, "Pos7");
    assert_eq!(parsed.channel, Some(1));
}

#[test]
fn test_token_scheme_composite_well() {
    let indices = TokenIndices {
        well: vec![0, 2],
        ..Default::default()
    };
    let scheme = TokenScheme::new(indices, ChannelLabels::default()).unwrap();
    let parsed = scheme.parse("plateA_x_B2_ch00.tif").unwrap();
    assert_eq!(parsed.well, "plateA-B2");
}

#[test]
fn test_token_scheme_needs_a_well_token() {
    assert!(auto().parse("nothing_here_ch00.tif").is_err());
}

#[test]
fn test_positional_scheme_needs_channel_index() {
    let indices = TokenIndices {
        well: vec![0],
        ..Default::default()
    };
    let err = PositionalScheme::new(indices, ChannelLabels::default());
    assert!(matches!(err, Err(CellStatsError::MissingTokenIndex("channel"))));
}

#[test]
fn test_positional_scheme_reads_bare_numbers() {
    let indices = TokenIndices {
        well: vec![1],
        channel: Some(3),
        z: Some(2),
        time: None,
    };
    let scheme = PositionalScheme::new(indices, ChannelLabels::default()).unwrap();
    let parsed = scheme.parse("exp_0012_5_2.png").unwrap();
    assert_eq!(parsed.well, "0012");
    assert_eq!(parsed.z, Some(5));
    assert_eq!(parsed.channel, Some(2));
    assert_eq!(parsed.descriptor, "exp_0012");
}
