use crate::{
    state::{ActionError, Toast, WalletSnapshot, WalletStore},
    validation::{TransferFormErrors, TransferRequest},
    web::{error::WebError, pages},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// POST /send form body
#[derive(Deserialize)]
pub struct SendForm {
    #[serde(default)]
    recipient: String,
    #[serde(default)]
    amount: String,
}

// Create router with all screens
pub fn create_router(store: Arc<WalletStore>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/wallet", get(wallet_overview))
        .route("/wallet/create", post(create_wallet))
        .route("/wallet/reset", post(reset_wallet))
        .route("/wallet/refresh", post(refresh_balance))
        .route("/wallet/airdrop", post(request_airdrop))
        .route("/send", get(send_form).post(submit_send))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Screens that need a wallet wait out the initial load, then bounce to the
/// entry screen if there is none.
fn require_wallet(store: &WalletStore) -> Result<WalletSnapshot, Response> {
    let snapshot = store.snapshot();
    if snapshot.is_loading() {
        return Err(Html(pages::loading_page()).into_response());
    }
    if !snapshot.has_wallet() {
        return Err(Redirect::to("/").into_response());
    }
    Ok(snapshot)
}

// GET / handler
async fn home(State(store): State<Arc<WalletStore>>) -> Html<String> {
    let snapshot = store.snapshot();
    let wallet_exists = store.has_stored_wallet();
    let toasts = store.take_toasts();
    Html(pages::home_page(&snapshot, wallet_exists, &toasts))
}

// GET /wallet handler
async fn wallet_overview(State(store): State<Arc<WalletStore>>) -> Response {
    let snapshot = match require_wallet(&store) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };
    let toasts = store.take_toasts();
    let now_ms = Utc::now().timestamp_millis();
    Html(pages::wallet_page(&snapshot, store.airdrop_amount(), &toasts, now_ms)).into_response()
}

// POST /wallet/create handler
async fn create_wallet(State(store): State<Arc<WalletStore>>) -> Redirect {
    match store.create_new_wallet().await {
        Ok(address) => {
            info!("Created wallet {}", address);
            Redirect::to("/wallet")
        }
        // Already toasted by the store
        Err(_) => Redirect::to("/"),
    }
}

// POST /wallet/reset handler
async fn reset_wallet(State(store): State<Arc<WalletStore>>) -> Result<Redirect, WebError> {
    store.reset_wallet().await?;
    info!("Wallet reset");
    Ok(Redirect::to("/"))
}

// POST /wallet/refresh handler
async fn refresh_balance(State(store): State<Arc<WalletStore>>) -> Redirect {
    match store.refresh_balance().await {
        Err(ActionError::NoWallet) => Redirect::to("/"),
        _ => Redirect::to("/wallet"),
    }
}

// POST /wallet/airdrop handler
async fn request_airdrop(State(store): State<Arc<WalletStore>>) -> Redirect {
    match store.request_airdrop().await {
        Ok(signature) => {
            info!("Airdrop confirmed: {}", signature);
            Redirect::to("/wallet")
        }
        Err(ActionError::NoWallet) => Redirect::to("/"),
        Err(ActionError::Busy) => {
            store.push_toast(Toast::error("Please wait", "Another request is still in progress"));
            Redirect::to("/wallet")
        }
        Err(_) => Redirect::to("/wallet"),
    }
}

// GET /send handler
async fn send_form(State(store): State<Arc<WalletStore>>) -> Response {
    let snapshot = match require_wallet(&store) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };
    let toasts = store.take_toasts();
    Html(pages::send_page(&snapshot, &pages::SendFormView::default(), &toasts)).into_response()
}

// POST /send handler
async fn submit_send(State(store): State<Arc<WalletStore>>, Form(form): Form<SendForm>) -> Response {
    let snapshot = match require_wallet(&store) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let mut view = pages::SendFormView {
        recipient: form.recipient.clone(),
        amount: form.amount.clone(),
        errors: TransferFormErrors::default(),
    };

    let request = match TransferRequest::parse(&form.recipient, &form.amount) {
        Ok(request) => request,
        Err(errors) => {
            warn!("Rejected send form: {:?}", errors);
            view.errors = errors;
            let toasts = store.take_toasts();
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(pages::send_page(&snapshot, &view, &toasts)),
            )
                .into_response();
        }
    };

    match store.send(&request).await {
        Ok(signature) => {
            info!("Transfer confirmed: {}", signature);
            Redirect::to("/wallet").into_response()
        }
        Err(ActionError::NoWallet) => Redirect::to("/").into_response(),
        Err(e) => {
            let status = match &e {
                ActionError::Invalid(err) => {
                    view.errors.amount = Some(err.clone());
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ActionError::Busy => {
                    store.push_toast(Toast::error("Please wait", "Another request is still in progress"));
                    StatusCode::CONFLICT
                }
                _ => StatusCode::BAD_GATEWAY,
            };
            let toasts = store.take_toasts();
            (status, Html(pages::send_page(&store.snapshot(), &view, &toasts))).into_response()
        }
    }
}

async fn not_found() -> WebError {
    WebError::NotFound("page".to_string())
}
