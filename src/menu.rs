use crate::blend::Selection;

use std::io::{ self, BufRead, Write };

const BANNER: &str = "\
######################################################
#                Hybrid Image Program                #
######################################################
";

fn print_menu(output: &mut impl Write) -> io::Result<()>{
    writeln!(output, "Please select one option from the menu:\n")?;
    writeln!(output, "1) The first image is closer")?;
    writeln!(output, "2) The second image is closer")?;
    output.flush()
}

/// Ask which image is dominant. Reads one non-whitespace character at a time
/// and keeps asking until it is '1' or '2'.
pub fn prompt_selection(mut input: impl BufRead, mut output: impl Write) -> io::Result<Selection>{
    writeln!(output, "{BANNER}")?;
    print_menu(&mut output)?;
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no selection given"));
        }
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            if let Some(selection) = Selection::from_char(c) {
                return Ok(selection);
            }
            print_menu(&mut output)?;
        }
    }
}
