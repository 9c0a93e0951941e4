//! Splitting `zle` words into option letters and arguments.

use zle_widgets::Options;

/// Letters the `zle` command accepts as options.
pub const OPTION_LETTERS: &str = "lDANCRMUKIFLac";

/// Split `words` the way the shell hands them to the `zle` builtin.
///
/// Leading words made only of known option letters (`-lL`, `-N`) are
/// consumed as options. The first other word ends them; a `--` is
/// consumed and ends them too. Everything after is an argument, so the
/// options of a widget call (`zle my-widget -n 3`) reach the widget.
pub fn parse_command_line(words: &[String]) -> (Options, Vec<String>) {
    let mut ops = Options::new();
    let mut rest = words;

    while let Some((word, tail)) = rest.split_first() {
        if word == "--" {
            rest = tail;
            break;
        }
        let Some(letters) = word.strip_prefix('-') else {
            break;
        };
        if letters.is_empty() || !letters.chars().all(|c| OPTION_LETTERS.contains(c)) {
            break;
        }
        letters.chars().for_each(|c| ops.set(c));
        rest = tail;
    }

    (ops, rest.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(w: &[&str]) -> Vec<String> {
        w.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options_then_arguments() {
        let (ops, args) = parse_command_line(&words(&["-lL", "a", "-D"]));
        assert_eq!(ops, Options::from_flags("lL"));
        assert_eq!(args, words(&["a", "-D"]));
    }

    #[test]
    fn test_separate_option_words() {
        let (ops, args) = parse_command_line(&words(&["-F", "-L", "3"]));
        assert_eq!(ops, Options::from_flags("FL"));
        assert_eq!(args, words(&["3"]));
    }

    #[test]
    fn test_double_dash_ends_options() {
        let (ops, args) = parse_command_line(&words(&["-N", "--", "-dash", "f"]));
        assert_eq!(ops, Options::from_flags("N"));
        assert_eq!(args, words(&["-dash", "f"]));
    }

    #[test]
    fn test_unknown_letters_are_arguments() {
        let (ops, args) = parse_command_line(&words(&["-N", "-dash"]));
        assert_eq!(ops, Options::from_flags("N"));
        assert_eq!(args, words(&["-dash"]));

        let (ops, args) = parse_command_line(&words(&["-", "x"]));
        assert_eq!(ops, Options::new());
        assert_eq!(args, words(&["-", "x"]));
    }

    #[test]
    fn test_widget_call_keeps_its_options() {
        let (ops, args) = parse_command_line(&words(&["my-widget", "-n", "3"]));
        assert_eq!(ops, Options::new());
        assert_eq!(args, words(&["my-widget", "-n", "3"]));
    }
}
