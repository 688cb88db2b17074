use std::io;

use plum_duel::cli::command_loop::run_stdio_loop;

fn main() -> io::Result<()> {
    run_stdio_loop()
}
