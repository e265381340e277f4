use std::io::{self, BufRead, Write};

// Deliberately blocks the whole run; the operator is the consumer of every
// lead, so nothing useful can happen until they press Enter.
pub fn pause_for_operator(prompt: &str) {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
