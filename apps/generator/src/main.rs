fn main() -> anyhow::Result<()> {
    inflection_cards::run()
}
