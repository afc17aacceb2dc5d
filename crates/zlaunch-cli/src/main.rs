use zlaunch_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI, run, and exit with the launcher's status.
    std::process::exit(cli::run_from_args());
}
