use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn banner(title: &str, subtitle: &str) {
    println!();
    println!("{}", title);
    println!("{}", subtitle.style(theme().dim.clone()));
    println!();
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}
