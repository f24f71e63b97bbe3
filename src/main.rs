fn main() -> anyhow::Result<()> {
    env_logger::init();
    rmxp_script_view::run()
}
