use crate::date::{format_full_date, format_time, french_weekday};
use crate::NotificationContext;
use chrono::Datelike;

/// Rendered confirmation email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn build_confirmation_email(ctx: &NotificationContext) -> EmailContent {
    let (weekday, date, time) = match ctx.local_start() {
        Some(start) => (
            french_weekday(start.weekday()),
            format_full_date(&start),
            format_time(&start),
        ),
        None => ("", String::new(), String::new()),
    };
    let stylist_line = ctx
        .stylist
        .as_ref()
        .map(|s| format!("Avec : {}", s.name));

    let subject = format!("Confirmation de votre rendez-vous chez {}", ctx.salon.name);

    let mut text = format!(
        "Bonjour {},\n\nVotre rendez-vous est confirmé.\n\nPrestation : {}\nDate : {} {} à {}\n",
        ctx.client.first_name, ctx.service.name, weekday, date, time
    );
    if let Some(line) = &stylist_line {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(&format!("\nÀ bientôt,\n{}\n", ctx.salon.name));

    let mut html = format!(
        "<p>Bonjour {},</p><p>Votre rendez-vous est confirmé.</p><ul><li>Prestation : {}</li><li>Date : {} {} à {}</li>",
        escape_html(&ctx.client.first_name),
        escape_html(&ctx.service.name),
        weekday,
        date,
        time
    );
    if let Some(line) = &stylist_line {
        html.push_str(&format!("<li>{}</li>", escape_html(line)));
    }
    html.push_str(&format!(
        "</ul><p>À bientôt,<br>{}</p>",
        escape_html(&ctx.salon.name)
    ));

    EmailContent {
        subject,
        html,
        text,
    }
}
