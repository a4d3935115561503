use colored::Colorize;

// stdout carries the changelog itself, so everything here goes to stderr

/// Print a success message
pub fn success_message(message: &str) {
    eprintln!("{} {}", "✅".green(), message.green());
}

/// Print a warning message
pub fn warning_message(message: &str) {
    eprintln!("{} {}", "⚠️ ".yellow(), message.yellow());
}

/// Print a simple informational message
pub fn info_message(message: &str) {
    eprintln!("{} {}", "ℹ️ ".blue(), message.blue());
}

pub fn error_line(message: &str) {
    eprintln!("{} {}", "Error:".bold().red(), message);
}
