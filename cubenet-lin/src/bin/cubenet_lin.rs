use clap::Parser;
use cubenet_lin::app::LinApp;

fn main() {
    env_logger::init();
    let args = LinApp::parse();
    if let Err(e) = args.op.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
