use console::Style;
use pixmed_core::pipeline::config::FilterConfig;
use pixmed_core::pipeline::RunSummary;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_filter_summary(config: &FilterConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Pixmed Median Filter"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!("{} frames", config.filter_length))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Strategy"),
        s.method.apply_to(config.strategy)
    );

    match config.resize {
        Some(size) => println!(
            "  {:<14}{}",
            s.label.apply_to("Resize"),
            s.value.apply_to(size)
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Resize"),
            s.disabled.apply_to("native resolution")
        ),
    }

    let warmup = config.warmup_frames();
    if warmup > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Warm-up"),
            s.value.apply_to(format!("skip first {warmup} outputs"))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Warm-up"),
            s.disabled.apply_to("kept")
        );
    }

    if let Some(max) = config.max_frames {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Max frames"),
            s.value.apply_to(max)
        );
    }
    println!();
}

pub fn print_run_result(config: &FilterConfig, summary: &RunSummary) {
    let s = Styles::new();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!(
            "{} read, {} written ({}x{})",
            summary.frames_read, summary.frames_written, summary.width, summary.height
        ))
    );
    if summary.frames_written > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Saved to"),
            s.path.apply_to(config.output.display())
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Saved to"),
            s.disabled.apply_to("nothing (input shorter than warm-up)")
        );
    }
    println!();
}
