
#[macro_use]
extern crate tracing;


use taal::{
    config::DemoConfig,
    event_loop,
    logging::init_logging,
    resource_dir::{
        find_resource_dir,
        RESOURCES_DIR_NAME,
    },
};
use std::process::exit;


fn main() {
    init_logging();

    let resources = find_resource_dir(RESOURCES_DIR_NAME);
    let config = DemoConfig::load(&resources);

    if let Err(e) = event_loop::run(config, &resources) {
        error!("{:#}", e);
        exit(1);
    }
}
