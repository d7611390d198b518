use crate::controller::ConversationController;
use crate::markup::{Fragment, Markup};
use anyhow::Result;
use crossterm::style::Stylize;

/// One-shot mode: submit a single question, wait for the reply, and
/// print the assistant turn as styled terminal text.
pub async fn ask_once(controller: &mut ConversationController, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        println!("Nothing to ask; give me a question.");
        return Ok(());
    }

    controller.submit(question);
    controller.resolve_pending().await;

    let snapshot = controller.snapshot();
    if let Some(turn) = snapshot.turns.last() {
        match turn.display_content() {
            Some(markup) => print_markup(markup),
            None => println!("{}", turn.raw_content()),
        }
    }

    Ok(())
}

/// Render markup fragments as ANSI-styled text: headings and strong
/// spans bold, link labels underlined between their visible brackets.
fn print_markup(markup: &Markup) {
    for fragment in markup.fragments() {
        match fragment {
            Fragment::Heading(text) => print!("{}", text.as_str().bold().underlined()),
            Fragment::Text(text) => print!("{text}"),
            Fragment::Strong(text) => print!("{}", text.as_str().bold()),
            Fragment::LineBreak => println!(),
            Fragment::Link { label, url } => {
                print!("[{}]({url})", label.as_str().underlined())
            }
        }
    }
    println!();
}
