use json_union::{cli, logging};

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    tracing::debug!(?command_line_interface, "parsed command line");
    command_line_interface.run()
}
