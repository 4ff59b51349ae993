mod progress;
mod styling;
mod tables;

pub use progress::Spinner;
pub use styling::{
    bright_green, bright_red, bright_yellow, cyan, cyan_bold, dim, magenta_bold, status,
};
pub use tables::{config_table, execution_table};

/// Prints the `buddyctl` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚀 buddyctl"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Buddy pipeline deployments")
    );
}
