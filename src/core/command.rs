/// Prompt prefixed to every echoed command.
pub const PROMPT: &str = "kimeddy@portfolio:~$ ";

/// A submitted line split into its verb and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub arguments: Vec<String>,
}

impl Command {
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }
}

/// Splits on whitespace and lower-cases the verb. Blank input yields `None`.
///
/// There is no quoting or flag syntax: every token after the verb is an argument.
pub fn parse_command(input: &str) -> Option<Command> {
    let mut tokens = input.split_whitespace();
    let verb = tokens.next()?.to_lowercase();
    let arguments = tokens.map(str::to_string).collect();
    Some(Command { verb, arguments })
}
