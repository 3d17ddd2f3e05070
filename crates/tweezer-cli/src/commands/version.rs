//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - neutral-atom layer scheduling and Steane layout synthesis",
        style("Tweezer").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  tweezer-ir       Gate stream and layered circuit model");
    println!("  tweezer-compile  Scheduling, duplicate resolution and encoding passes");
    println!("  tweezer-cli      Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
