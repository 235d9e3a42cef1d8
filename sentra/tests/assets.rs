use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use sentra::asset::{AssetUpdate, NewAsset};
use sentra::repositories::{AssetFilter, Page};
use sentra::{
    Account, AssetStatus, AssetType, RegisterAccount, RepositoryProvider, Sentra, Severity,
    SqliteRepositoryProvider, TokenConfig,
};

const TEST_HS256_SECRET: &[u8] = b"this_is_a_test_secret_key_for_hs256_tokens_not_for_prod";

async fn setup() -> (Sentra<SqliteRepositoryProvider>, Account) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let repositories = SqliteRepositoryProvider::new(pool);
    repositories.migrate().await.unwrap();

    let sentra = Sentra::new(
        Arc::new(repositories),
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
    );

    let (owner, _) = sentra
        .register(RegisterAccount {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "secret1".to_string(),
            first_name: "Ad".to_string(),
            last_name: "Min".to_string(),
            role: None,
            department_id: None,
        })
        .await
        .unwrap();

    (sentra, owner)
}

fn new_asset(owner: &Account, name: &str, asset_type: AssetType) -> NewAsset {
    NewAsset::builder()
        .name(name.to_string())
        .asset_type(asset_type)
        .location("dc-1".to_string())
        .owner_id(owner.id.clone())
        .criticality(Severity::High)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_register_and_get() {
    let (sentra, owner) = setup().await;

    let asset = sentra
        .assets()
        .register_asset(new_asset(&owner, "db-primary", AssetType::Database))
        .await
        .unwrap();

    assert_eq!(asset.status, AssetStatus::Active);
    assert_eq!(asset.owner_id, owner.id);
    assert!(asset.id.as_str().starts_with("ast_"));

    let fetched = sentra.assets().get(&asset.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "db-primary");

    let missing = sentra.assets().get(&"ast_does_not_exist".into()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_list_with_filters() {
    let (sentra, owner) = setup().await;

    for i in 0..4 {
        sentra
            .assets()
            .register_asset(new_asset(&owner, &format!("srv-{i}"), AssetType::Server))
            .await
            .unwrap();
    }
    sentra
        .assets()
        .register_asset(new_asset(&owner, "laptop-1", AssetType::Workstation))
        .await
        .unwrap();

    let all = sentra
        .assets()
        .list(&AssetFilter::default(), &Page::default())
        .await
        .unwrap();
    assert_eq!(all.total, 5);

    let servers = sentra
        .assets()
        .list(
            &AssetFilter {
                asset_type: Some(AssetType::Server),
                ..Default::default()
            },
            &Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(servers.total, 4);
    assert!(servers.items.iter().all(|a| a.asset_type == AssetType::Server));
}

#[tokio::test]
async fn test_partial_update() {
    let (sentra, owner) = setup().await;
    let asset = sentra
        .assets()
        .register_asset(new_asset(&owner, "srv-1", AssetType::Server))
        .await
        .unwrap();

    let updated = sentra
        .assets()
        .update(
            &asset.id,
            AssetUpdate {
                status: Some(AssetStatus::Compromised),
                ip_address: Some("10.0.0.12".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, AssetStatus::Compromised);
    assert_eq!(updated.ip_address.as_deref(), Some("10.0.0.12"));
    assert_eq!(updated.name, "srv-1");
    assert_eq!(updated.criticality, Severity::High);

    let status_filtered = sentra
        .assets()
        .list(
            &AssetFilter {
                status: Some(AssetStatus::Compromised),
                ..Default::default()
            },
            &Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(status_filtered.total, 1);

    let missing = sentra
        .assets()
        .update(&"ast_does_not_exist".into(), AssetUpdate::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete() {
    let (sentra, owner) = setup().await;
    let asset = sentra
        .assets()
        .register_asset(new_asset(&owner, "srv-1", AssetType::Server))
        .await
        .unwrap();

    sentra.assets().delete(&asset.id).await.unwrap();
    assert!(sentra.assets().get(&asset.id).await.unwrap().is_none());
    assert!(sentra.assets().delete(&asset.id).await.is_err());
}
