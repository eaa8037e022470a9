use crate::config::ITEM_MASTER_RANGE;
use crate::error::AppError;
use crate::sheets::{item_names, resolve_client};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use inventory_common::model::items::ItemList;

pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let items = match load_items(&state).await {
        Ok(items) => items,
        Err(e) => {
            log::error!("Error loading items from Item_Master: {}", e);
            Vec::new()
        }
    };
    HttpResponse::Ok().json(ItemList { items })
}

async fn load_items(state: &AppState) -> Result<Vec<String>, AppError> {
    let sheet = resolve_client(&state.config, state.connector.as_ref()).await?;
    let rows = sheet.read_range(ITEM_MASTER_RANGE).await?;
    Ok(item_names(&rows))
}
