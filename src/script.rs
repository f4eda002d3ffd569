//! Dialogue formatting for generated podcast scripts.
//!
//! The script endpoint marks speaker turns as `**Andy:** text`. The audio
//! backend expects `Andy："text"`, one turn per line.

fn marker(speaker: &str) -> String {
    format!("**{speaker}:** ")
}

fn turn_prefix(speaker: &str) -> String {
    format!("{speaker}：\"")
}

/// Rewrite markdown speaker markers into quoted dialogue lines
pub fn format_dialogue(raw: &str, speakers: &[String]) -> String {
    let mut text = raw.to_string();
    for speaker in speakers {
        text = text.replace(&marker(speaker), &turn_prefix(speaker));
    }

    let prefixes: Vec<String> = speakers.iter().map(|s| turn_prefix(s)).collect();

    text.split('\n')
        .map(|line| {
            if prefixes.iter().any(|p| line.starts_with(p.as_str())) {
                format!("{line}\"")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
