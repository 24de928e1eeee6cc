fn main() -> anyhow::Result<()> {
    focus_timeline_lib::run()
}
