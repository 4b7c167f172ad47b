fn main() -> anyhow::Result<()> {
    guidrelink::cli::run_cli()
}
