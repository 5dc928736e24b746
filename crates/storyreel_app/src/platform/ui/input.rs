use storyreel_core::Tab;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Generate,
    StartAutomation,
    ShowTab(Tab),
    DismissNotice,
    Help,
    Quit,
    Unknown(String),
}

/// Maps one line typed by the user to a command. Blank lines redraw help.
pub fn parse_command(line: &str) -> UiCommand {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "g" | "generate" => UiCommand::Generate,
        "a" | "automation" => UiCommand::StartAutomation,
        "1" | "d" | "dashboard" => UiCommand::ShowTab(Tab::Dashboard),
        "2" | "v" | "videos" => UiCommand::ShowTab(Tab::Videos),
        "3" | "i" | "about" => UiCommand::ShowTab(Tab::About),
        "x" | "ok" | "dismiss" => UiCommand::DismissNotice,
        "" | "h" | "?" | "help" => UiCommand::Help,
        "q" | "quit" | "exit" => UiCommand::Quit,
        _ => UiCommand::Unknown(line.trim().to_string()),
    }
}

pub const HELP: &str =
    "[g] generate  [a] start automation  [1] dashboard  [2] videos  [3] about  [x] dismiss  [q] quit";
