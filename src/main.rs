//! glscope binary entry point.

use glscope::cli;
use glscope::ui::output;

fn main() {
    if let Err(e) = cli::run() {
        output::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
