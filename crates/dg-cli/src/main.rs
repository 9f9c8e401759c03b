fn main() {
    dg_cli::init_tracing();
    std::process::exit(dg_cli::run_cli_from_args(std::env::args_os()));
}
