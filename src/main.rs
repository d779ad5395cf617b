use anyhow::Result;
use minish::Shell;

fn main() -> Result<()> {
    Shell::new().repl()
}
