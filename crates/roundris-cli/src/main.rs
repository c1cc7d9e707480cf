mod command;
mod storage;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
