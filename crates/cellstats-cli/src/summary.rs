use cellstats_core::aggregate::channel_titles;
use cellstats_core::config::AnalysisConfig;
use cellstats_core::pipeline::{PreparedWell, RunSummary};
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    role: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            role: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_config_summary(config: &AnalysisConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Cell Statistics"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(format!("*.{} ({} naming)", config.image_type, config.naming))
    );
    println!();

    println!("  {}", s.header.apply_to("Channels"));
    for (idx, role) in config.channel_labels.iter().enumerate() {
        let styled = if role.is_skip() {
            s.disabled.apply_to(role.to_string())
        } else {
            s.role.apply_to(role.to_string())
        };
        println!("    {:<12}{}", s.label.apply_to(format!("ch{idx:02}")), styled);
    }
    println!();

    println!("  {}", s.header.apply_to("Analysis"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("ROI"),
        s.value.apply_to(config.analysis_roi)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Pixel"),
        s.value.apply_to(format!(
            "{} x {} \u{b5}m",
            config.pixel_width, config.pixel_height
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Z / T"),
        s.value.apply_to(format!("{} / {}", config.num_z, config.num_timepoints))
    );
    if config.well_names.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Wells"),
            s.disabled.apply_to("all")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Wells"),
            s.value.apply_to(config.well_names.join(", "))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Reported"),
        s.value.apply_to(channel_titles(config).join(", "))
    );
    if config.debug_output {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Debug"),
            s.role.apply_to("images enabled")
        );
    }
    println!();
}

pub fn print_run_summary(summary: &RunSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Results"));
    for result in &summary.processed {
        println!(
            "    {:<12}{}",
            s.label.apply_to(&result.well),
            s.value.apply_to(format!(
                "{} row(s), {} particle(s)",
                result.rows.len(),
                result.particle_count()
            ))
        );
    }
    for skipped in &summary.skipped {
        println!(
            "    {:<12}{}",
            s.label.apply_to(&skipped.well),
            s.disabled.apply_to(format!("skipped: {}", skipped.reason))
        );
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Report"),
        s.path.apply_to(summary.report_path.display())
    );
    println!();
}

pub fn print_well_index(prepared: &PreparedWell) {
    let s = Styles::new();
    let (channels, z, t) = prepared.grid.dims();
    println!(
        "  {:<10}{}  {}",
        s.value.apply_to(&prepared.well.name),
        s.label.apply_to(&prepared.well.descriptor),
        s.role.apply_to(format!(
            "{} file(s), {channels} channel(s) x {z} Z x {t} T",
            prepared.well.files.len()
        ))
    );
}
