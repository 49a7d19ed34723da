fn main() -> anyhow::Result<()> {
    bootplot::cli::run::entry()
}
