//! Plain-text rendering of the view models.

use std::fmt::{self, Write};

use client_frontend_core::view_model::{BattleLogView, BeastPanel, ButtonData};
use client_frontend_core::{BeastScreenView, HeaderView, InfoView};

pub fn header(view: &HeaderView) -> String {
    render(|out| write_header(out, view))
}

pub fn info(view: &InfoView) -> String {
    render(|out| write_info(out, view))
}

pub fn beast_screen(view: &BeastScreenView) -> String {
    render(|out| write_beast_screen(out, view))
        .trim_end()
        .to_string()
}

/// Run `write` into a fresh string. Writing to a `String` cannot fail.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    if write(&mut out).is_err() {
        tracing::warn!("Rendering was cut short");
    }
    out
}

fn write_header(out: &mut String, view: &HeaderView) -> fmt::Result {
    write!(out, "[{}]  LORDS {}", view.account_label, view.lords_label)?;
    if let Some(penalty) = &view.penalty {
        let marker = if penalty.refreshing { "~" } else { "" };
        if penalty.expired() {
            write!(out, "  idle penalty: due{marker}")?;
        } else {
            write!(out, "  idle penalty in {}s{marker}", penalty.seconds_left)?;
        }
    }
    if let Some(cart) = &view.cart {
        write!(out, "  cart: {}", cart.calls)?;
    }
    if view.muted {
        out.push_str("  (muted)");
    }
    Ok(())
}

fn write_info(out: &mut String, view: &InfoView) -> fmt::Result {
    let name = if view.name.is_empty() { "-" } else { view.name.as_str() };
    writeln!(
        out,
        "{name}  HP {}  Gold {}  Lvl {} ({}%, {} xp to next)",
        view.health,
        view.gold,
        view.level.level,
        view.level.percent(),
        view.level.xp_to_next()
    )?;

    if view.content_hidden {
        out.push_str("  loading items...\n");
    } else {
        for slot in &view.slots {
            let item = match (&slot.item, slot.tier, slot.greatness) {
                (Some(name), Some(tier), Some(greatness)) => {
                    format!("{name} (T{tier}, G{greatness})")
                }
                (Some(name), ..) => name.clone(),
                _ => "None Equipped".to_string(),
            };
            writeln!(out, "  {:<7} {item}", slot.slot.as_str())?;
        }
    }

    let stats: Vec<String> = view
        .stats
        .iter()
        .map(|row| format!("{} {}", row.label, row.value))
        .collect();
    write!(out, "  {}", stats.join(" | "))
}

fn write_beast_screen(out: &mut String, view: &BeastScreenView) -> fmt::Result {
    match &view.beast {
        BeastPanel::Discovered {
            name,
            health,
            level,
            tier,
        } => writeln!(out, "{name}  HP {health}  Lvl {level}  T{tier}")?,
        BeastPanel::Placeholder(text) => writeln!(out, "{text}")?,
    }

    if view.show_controls {
        writeln!(out, "  Attack: {}", buttons(&view.attack_buttons))?;
        writeln!(out, "  {} {}", view.flee_heading, buttons(&view.flee_buttons))?;
    }

    if view.show_inline_log || view.log_screen_open {
        write_battle_log(out, &view.battle_log)?;
    }
    Ok(())
}

fn buttons(buttons: &[ButtonData]) -> String {
    buttons
        .iter()
        .map(|button| {
            if button.loading {
                format!("[{} ...]", button.label)
            } else if button.disabled {
                format!("({})", button.label)
            } else {
                format!("[{}]", button.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_battle_log(out: &mut String, log: &BattleLogView) -> fmt::Result {
    writeln!(out, "  {}", log.title)?;
    for line in log.lines.iter().take(5) {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}
