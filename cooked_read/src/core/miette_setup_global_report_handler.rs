// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Installs the fancy [miette](https://docs.rs/miette/latest/miette/index.html) report
//! handler used when a binary returns `miette::Result` from `main()`.

use miette::MietteHandlerOpts;

/// The [`miette::ErrorHook`] is lazily evaluated, so the terminal width is only measured
/// when a report is actually rendered.
pub fn setup_default_miette_global_report_handler(issues_url: &'static str) {
    miette::set_hook(Box::new(|_report| {
        let terminal_width = crossterm::terminal::size()
            .map(|(columns, _rows)| usize::from(columns))
            .unwrap_or(80);
        tracing::debug!(message = "miette::set_hook", terminal_width);
        Box::new(
            MietteHandlerOpts::new()
                .width(terminal_width)
                .wrap_lines(true)
                .force_graphical(true)
                .unicode(true)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .with_cause_chain()
                .footer(issues_url.to_string())
                .build(),
        )
    }))
    .ok();
}
