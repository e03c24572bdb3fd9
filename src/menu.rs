//! Interactive variant picker.
//!
//! Re-prompts on anything it does not recognize; a valid choice ends the
//! menu. End of input counts as "exit".

use std::io::{self, BufRead, Write};

use crate::simulation::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Variant),
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(MenuChoice::Exit),
            "1" => Some(MenuChoice::Run(Variant::Unsynchronized)),
            "2" => Some(MenuChoice::Run(Variant::Synchronized)),
            _ => None,
        }
    }
}

pub struct Menu<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Prompts until a valid option is entered.
    pub fn choose(&mut self) -> io::Result<MenuChoice> {
        let mut line = String::new();

        loop {
            self.print_options()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                return Ok(MenuChoice::Exit);
            }

            match MenuChoice::parse(&line) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.out, "Invalid choice! Please try again.")?,
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    fn print_options(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== MULTITHREADING DEMONSTRATIONS MENU ===")?;
        writeln!(self.out, "1. {} (without Synchronization)", Variant::Unsynchronized.label())?;
        writeln!(self.out, "2. {} (with Synchronization)", Variant::Synchronized.label())?;
        writeln!(self.out, "0. Exit")?;
        write!(self.out, "Choose option: ")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn menu(input: &str) -> Menu<Cursor<Vec<u8>>, Vec<u8>> {
        Menu::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse(" 1\n"), Some(MenuChoice::Run(Variant::Unsynchronized)));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::Run(Variant::Synchronized)));
        assert_eq!(MenuChoice::parse("3"), None);
        assert_eq!(MenuChoice::parse("safe"), None);
    }

    #[test]
    fn test_retries_until_valid() {
        let mut menu = menu("7\nabc\n2\n");
        assert_eq!(menu.choose().unwrap(), MenuChoice::Run(Variant::Synchronized));

        let (_, out) = menu.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Invalid choice! Please try again.").count(), 2);
        assert_eq!(text.matches("Choose option: ").count(), 3);
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut menu = menu("9\n");
        assert_eq!(menu.choose().unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn test_lists_both_variants() {
        let mut menu = menu("0\n");
        menu.choose().unwrap();

        let (_, out) = menu.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. Unsafe Version (without Synchronization)"));
        assert!(text.contains("2. Safe Version (with Synchronization)"));
    }
}
