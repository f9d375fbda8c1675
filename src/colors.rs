/// Color support with NO_COLOR and CLICOLOR environment variable handling
///
/// Implements the NO_COLOR standard (https://no-color.org/) and traditional
/// CLICOLOR conventions, with an explicit `--color` flag on top.
///
/// **Precedence**: `--color always|never`, then `NO_COLOR`, then
/// `CLICOLOR_FORCE`, then `CLICOLOR=0`, then TTY detection.
use clap::ValueEnum;
use colored::control;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Initialize color support for the entire program
pub fn init_colors(choice: ColorChoice) {
    control::set_override(resolve(
        choice,
        |name| std::env::var(name).ok(),
        std::io::IsTerminal::is_terminal(&std::io::stdout()),
    ));
}

fn resolve(choice: ColorChoice, env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    match choice {
        ColorChoice::Always => return true,
        ColorChoice::Never => return false,
        ColorChoice::Auto => {}
    }

    // NO_COLOR takes precedence over the environment (https://no-color.org/)
    if env("NO_COLOR").is_some() {
        return false;
    }

    // CLICOLOR_FORCE overrides both CLICOLOR and TTY detection
    if env("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }

    if env("CLICOLOR").is_some_and(|v| v == "0") {
        return false;
    }

    is_tty
}
