pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{
    db_path_from_args, expand_path, handle_seed, handle_verify, init_logging,
    report_format_from_args, seed_config_from_args,
};
