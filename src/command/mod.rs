mod routes;
mod run;
mod show_config;

pub use routes::run_routes;
pub use run::{run_dashboard, RunOptions};
pub use show_config::run_show_config;
