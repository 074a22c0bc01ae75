//! HTML rendering for the wallet screens

use crate::config::Network;
use crate::models::{TransactionKind, TransactionRecord};
use crate::state::{Toast, ToastVariant, WalletSnapshot};
use crate::validation::{format_address_for_display, TransferFormErrors};
use axum::http::StatusCode;
use chrono::Duration;
use std::fmt::Write;

/// Addresses up to this length fit on the overview card untruncated.
const OVERVIEW_FULL_ADDRESS_MAX: usize = 20;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f4f4f6; margin: 0; padding: 2rem 1rem; }
main { max-width: 28rem; margin: 0 auto; }
.card { background: #fff; border-radius: .5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); padding: 1.25rem; margin-bottom: 1.5rem; }
.muted { color: #6b7280; font-size: .875rem; }
.mono { font-family: ui-monospace, monospace; word-break: break-all; }
.balance { font-size: 1.5rem; font-weight: 700; }
.row { display: flex; justify-content: space-between; align-items: center; gap: .5rem; }
.toast { border-radius: .375rem; padding: .75rem 1rem; margin-bottom: 1rem; background: #eef2ff; }
.toast.destructive { background: #fee2e2; }
.field-error { color: #dc2626; font-size: .875rem; }
.send { color: #ef4444; } .credit { color: #22c55e; }
button, .button { background: #6366f1; color: #fff; border: 0; border-radius: .375rem; padding: .5rem 1rem; cursor: pointer; text-decoration: none; display: inline-block; }
button.outline, .button.outline { background: #fff; color: #111; border: 1px solid #d1d5db; }
input { width: 100%; box-sizing: border-box; padding: .5rem; margin: .25rem 0; }
ul.txs { list-style: none; padding: 0; margin: 0; }
ul.txs li { border-top: 1px solid #e5e7eb; padding: .75rem 0; }
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Coarse "time ago" wording for transaction timestamps.
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = Duration::milliseconds((now_ms - timestamp_ms).max(0));
    let seconds = elapsed.num_seconds();
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    match seconds {
        s if s < 45 => "less than a minute ago".to_string(),
        s if s < 90 => "1 minute ago".to_string(),
        _ if minutes < 45 => format!("{} minutes ago", minutes),
        _ if minutes < 90 => "about 1 hour ago".to_string(),
        _ if hours < 24 => format!("about {} hours ago", hours),
        _ if hours < 42 => "1 day ago".to_string(),
        _ if days < 30 => format!("{} days ago", days),
        _ if days < 45 => "about 1 month ago".to_string(),
        _ if days < 365 => format!("{} months ago", days / 30),
        _ => format!("about {} years ago", days / 365),
    }
}

fn overview_address(address: &str) -> String {
    if address.len() > OVERVIEW_FULL_ADDRESS_MAX {
        format_address_for_display(address)
    } else {
        address.to_string()
    }
}

fn render_toasts(toasts: &[Toast]) -> String {
    let mut out = String::new();
    for toast in toasts {
        let class = match toast.variant {
            ToastVariant::Default => "toast",
            ToastVariant::Destructive => "toast destructive",
        };
        let _ = write!(
            out,
            r#"<div class="{}" role="status"><strong>{}</strong><div>{}</div></div>"#,
            class,
            escape_html(&toast.title),
            escape_html(&toast.description)
        );
    }
    out
}

fn layout(title: &str, head_extra: &str, toasts: &[Toast], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{head_extra}
<style>{STYLE}</style>
</head>
<body>
<main>
{toasts}
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        head_extra = head_extra,
        toasts = render_toasts(toasts),
        body = body,
    )
}

pub fn loading_page() -> String {
    layout(
        "Loading wallet...",
        r#"<meta http-equiv="refresh" content="1">"#,
        &[],
        r#"<div class="card"><p class="muted">Loading wallet...</p></div>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<div class="card"><h1>{}</h1><p>{}</p><a class="button outline" href="/">Home</a></div>"#,
        status,
        escape_html(message)
    );
    layout("Error", "", &[], &body)
}

pub fn home_page(snapshot: &WalletSnapshot, wallet_exists: bool, toasts: &[Toast]) -> String {
    let description = if wallet_exists {
        "You already have a burner wallet"
    } else {
        "Create a new burner wallet in seconds"
    };

    let actions = if snapshot.is_loading() {
        r#"<p class="muted">Loading...</p>"#.to_string()
    } else if wallet_exists {
        r#"<p><a class="button" href="/wallet">Go to Wallet</a></p>
<form method="post" action="/wallet/reset"><button class="outline" type="submit">Reset Wallet</button></form>"#
            .to_string()
    } else {
        r#"<form method="post" action="/wallet/create"><button type="submit">Create New Wallet</button></form>"#
            .to_string()
    };

    let body = format!(
        r#"<h1>Solana Burner Wallet</h1>
<p class="muted">A lightweight, ephemeral wallet for Solana. No sign-up required.</p>
<div class="card">
<h2>Get Started</h2>
<p class="muted">{description}</p>
{actions}
<p class="muted">Running on Solana {network}</p>
</div>
<p class="muted">All wallet data is stored locally on this machine.</p>"#,
        description = description,
        actions = actions,
        network = snapshot.network.label(),
    );
    layout("Solana Burner Wallet", "", toasts, &body)
}

fn render_transaction(tx: &TransactionRecord, network: Network, now_ms: i64) -> String {
    let (label, sign, class) = match tx.kind {
        TransactionKind::Send => ("Sent SOL", "-", "send"),
        TransactionKind::Receive => ("Received SOL", "+", "credit"),
        TransactionKind::Airdrop => ("Airdrop", "+", "credit"),
    };
    let counterparty = tx
        .counterparty
        .as_deref()
        .map(|party| {
            format!(
                r#"<div class="muted mono">{}</div>"#,
                escape_html(&format_address_for_display(party))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li><div class="row"><div><strong>{label}</strong>{counterparty}<div class="muted">{when}</div></div>
<div><div class="{class}">{sign}{amount} SOL</div><a class="muted" href="{explorer}" target="_blank" rel="noopener noreferrer">View</a></div></div></li>"#,
        label = label,
        counterparty = counterparty,
        when = format_relative_time(tx.timestamp, now_ms),
        class = class,
        sign = sign,
        amount = tx.amount,
        explorer = escape_html(&network.explorer_tx_url(&tx.signature)),
    )
}

pub fn wallet_page(snapshot: &WalletSnapshot, airdrop_amount: f64, toasts: &[Toast], now_ms: i64) -> String {
    let address = snapshot.public_key.as_deref().unwrap_or_default();
    let balance = match snapshot.balance {
        Some(balance) => format!("{} SOL", balance),
        None => "Balance unavailable".to_string(),
    };

    let transactions = if snapshot.transactions.is_empty() {
        r#"<p class="muted">No transactions yet</p>"#.to_string()
    } else {
        let items: String = snapshot
            .transactions
            .iter()
            .map(|tx| render_transaction(tx, snapshot.network, now_ms))
            .collect();
        format!(r#"<ul class="txs">{}</ul>"#, items)
    };

    let body = format!(
        r#"<div class="row"><a class="button outline" href="/">Home</a><h1>Burner Wallet</h1>
<form method="post" action="/wallet/reset"><button class="outline" type="submit">Reset</button></form></div>
<div class="card">
<h2>Wallet Overview</h2>
<p class="muted">Your Solana burner wallet on {network}</p>
<h3 class="muted">Public Address</h3>
<p class="mono" title="{address_full}">{address}</p>
<h3 class="muted">Balance</h3>
<div class="row"><span class="balance">{balance}</span>
<form method="post" action="/wallet/refresh"><button class="outline" type="submit">Refresh</button></form></div>
<div class="row">
<a class="button outline" href="/send">Send SOL</a>
<form method="post" action="/wallet/airdrop"><button type="submit">Airdrop {airdrop} SOL</button></form>
</div>
</div>
<div class="card">
<h2>Transactions</h2>
<p class="muted">Recent wallet activity</p>
{transactions}
</div>"#,
        network = snapshot.network.cluster(),
        address_full = escape_html(address),
        address = escape_html(&overview_address(address)),
        balance = balance,
        airdrop = airdrop_amount,
        transactions = transactions,
    );
    layout("Burner Wallet", "", toasts, &body)
}

/// What the send form shows: the submitted values and any field errors.
#[derive(Debug, Clone)]
pub struct SendFormView {
    pub recipient: String,
    pub amount: String,
    pub errors: TransferFormErrors,
}

impl Default for SendFormView {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            amount: "0.1".to_string(),
            errors: TransferFormErrors::default(),
        }
    }
}

fn field_error(error: &Option<crate::validation::ValidationError>) -> String {
    error
        .as_ref()
        .map(|e| format!(r#"<div class="field-error">{}</div>"#, escape_html(&e.to_string())))
        .unwrap_or_default()
}

pub fn send_page(snapshot: &WalletSnapshot, form: &SendFormView, toasts: &[Toast]) -> String {
    let available = snapshot
        .balance
        .map(|b| format!("{} SOL", b))
        .unwrap_or_else(|| "unknown".to_string());

    let body = format!(
        r#"<h1>Send SOL</h1>
<div class="card">
<p class="muted">Transfer SOL to another wallet</p>
<form method="post" action="/send">
<label for="recipient">Recipient Address</label>
<input id="recipient" name="recipient" placeholder="Solana address" value="{recipient}">
<div class="muted">Enter a valid Solana wallet address</div>
{recipient_error}
<label for="amount">Amount (SOL)</label>
<input id="amount" name="amount" type="number" step="0.000001" min="0.000001" value="{amount}">
<div class="muted">Available balance: {available}</div>
{amount_error}
<div class="row">
<a class="button outline" href="/wallet">Back</a>
<button type="submit">Send SOL</button>
</div>
</form>
</div>"#,
        recipient = escape_html(&form.recipient),
        recipient_error = field_error(&form.errors.recipient),
        amount = escape_html(&form.amount),
        available = available,
        amount_error = field_error(&form.errors.amount),
    );
    layout("Send SOL", "", toasts, &body)
}
