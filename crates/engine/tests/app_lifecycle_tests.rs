//! App and secret lifecycle tests against a migrated SQLite database.

use migration::{Migrator, MigratorTrait};
use oauth_grant_engine::entity::{oauth_client_secret, oauth_token};
use oauth_grant_engine::generate::RandomCodeGenerate;
use oauth_grant_engine::manager::{AuthorizeGenerateRequest, CreateOAuthAppReq, UpdateOAuthAppReq};
use oauth_grant_engine::model::{AppType, OwnerType};
use oauth_grant_engine::store::{DbOAuthAppStore, DbTokenStore};
use oauth_grant_engine::{ErrorKind, OAuthManager};
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;
use time::Duration;

async fn create_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.expect("connect");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(db)
}

fn create_manager(db: Arc<DatabaseConnection>) -> OAuthManager {
    OAuthManager::new(
        Arc::new(DbOAuthAppStore::new(db.clone())),
        Arc::new(DbTokenStore::new(db)),
        Arc::new(RandomCodeGenerate),
        Duration::minutes(10),
        Duration::hours(24),
    )
}

fn app_request(app_type: AppType) -> CreateOAuthAppReq {
    CreateOAuthAppReq {
        name: "Release Dashboard".into(),
        redirect_uri: "https://dashboard.example.org/oauth/callback".into(),
        home_url: "https://dashboard.example.org".into(),
        desc: "Shows release pipelines".into(),
        owner_type: OwnerType::Group,
        owner_id: 7,
        app_type,
    }
}

#[tokio::test]
async fn test_create_and_get_platform_app() {
    let manager = create_manager(create_test_db().await);

    let app = manager
        .create_oauth_app(app_request(AppType::Platform))
        .await
        .expect("create app");
    assert_eq!(app.client_id.len(), 22);
    assert!(app.client_id.starts_with("ho"));
    assert_eq!(app.app_type, AppType::Platform);
    assert_eq!(app.owner_type, OwnerType::Group);
    assert_eq!(app.owner_id, 7);
    assert_eq!(app.name, "Release Dashboard");

    let fetched = manager.get_oauth_app(&app.client_id).await.expect("get app");
    assert_eq!(fetched, app);
}

#[tokio::test]
async fn test_create_direct_app() {
    let manager = create_manager(create_test_db().await);

    let app = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");
    assert_eq!(app.client_id.len(), 20);
    assert!(app.client_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(app.app_type, AppType::Direct);
}

#[tokio::test]
async fn test_get_missing_app_is_not_found() {
    let manager = create_manager(create_test_db().await);

    let err = manager.get_oauth_app("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_app_keeps_identity() {
    let manager = create_manager(create_test_db().await);
    let app = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");

    let updated = manager
        .update_oauth_app(
            &app.client_id,
            UpdateOAuthAppReq {
                name: "Renamed".into(),
                redirect_uri: "https://new.example.org/cb".into(),
                home_url: "https://new.example.org".into(),
                desc: String::new(),
            },
        )
        .await
        .expect("update app");

    assert_eq!(updated.client_id, app.client_id);
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.redirect_uri, "https://new.example.org/cb");
    assert_eq!(updated.owner_id, app.owner_id);
    assert_eq!(updated.app_type, app.app_type);
    assert!(updated.updated_at >= app.updated_at);

    let err = manager
        .update_oauth_app(
            "missing",
            UpdateOAuthAppReq {
                name: "x".into(),
                redirect_uri: "x".into(),
                home_url: "x".into(),
                desc: "x".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_apps_by_owner() {
    let manager = create_manager(create_test_db().await);
    let first = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");
    let second = manager
        .create_oauth_app(app_request(AppType::Platform))
        .await
        .expect("create app");
    manager
        .create_oauth_app(CreateOAuthAppReq {
            owner_type: OwnerType::User,
            ..app_request(AppType::Direct)
        })
        .await
        .expect("create app");

    let apps = manager
        .list_oauth_apps(OwnerType::Group, 7)
        .await
        .expect("list apps");
    let ids: Vec<_> = apps.iter().map(|a| a.client_id.as_str()).collect();
    assert_eq!(apps.len(), 2);
    assert!(ids.contains(&first.client_id.as_str()));
    assert!(ids.contains(&second.client_id.as_str()));

    assert!(
        manager
            .list_oauth_apps(OwnerType::Group, 8)
            .await
            .expect("list apps")
            .is_empty()
    );
}

#[tokio::test]
async fn test_secret_plaintext_only_on_create() {
    let manager = create_manager(create_test_db().await);
    let app = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");

    let secret = manager
        .create_secret(&app.client_id, Some(99))
        .await
        .expect("create secret");
    assert_eq!(secret.client_secret.len(), 40);
    assert!(secret.client_secret.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(secret.created_by, Some(99));

    let listed = manager.list_secret(&app.client_id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, secret.id);
    assert_eq!(
        listed[0].client_secret,
        format!("*****{}", &secret.client_secret[31..39])
    );
}

#[tokio::test]
async fn test_secret_rotation() {
    let manager = create_manager(create_test_db().await);
    let app = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");

    let old = manager
        .create_secret(&app.client_id, None)
        .await
        .expect("create secret");
    let new = manager
        .create_secret(&app.client_id, None)
        .await
        .expect("create secret");
    assert_ne!(old.client_secret, new.client_secret);
    assert_eq!(manager.list_secret(&app.client_id).await.unwrap().len(), 2);

    manager
        .delete_secret(&app.client_id, old.id)
        .await
        .expect("delete secret");
    let remaining = manager.list_secret(&app.client_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, new.id);

    let err = manager
        .delete_secret(&app.client_id, old.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_secret_for_missing_app() {
    let manager = create_manager(create_test_db().await);

    let err = manager.create_secret("ghost", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_app_cascades() {
    let db = create_test_db().await;
    let manager = create_manager(db.clone());
    let app = manager
        .create_oauth_app(app_request(AppType::Platform))
        .await
        .expect("create app");
    let other = manager
        .create_oauth_app(app_request(AppType::Direct))
        .await
        .expect("create app");

    for _ in 0..3 {
        manager.create_secret(&app.client_id, None).await.unwrap();
    }
    manager.create_secret(&other.client_id, None).await.unwrap();
    for client_id in [&app.client_id, &app.client_id, &other.client_id] {
        manager
            .gen_authorize_code(&AuthorizeGenerateRequest {
                client_id: client_id.clone(),
                redirect_url: "https://dashboard.example.org/oauth/callback".into(),
                state: "s".into(),
                scope: "read".into(),
                user_identity: "user:1".into(),
                ..Default::default()
            })
            .await
            .expect("authorize");
    }

    manager
        .delete_oauth_app(&app.client_id)
        .await
        .expect("delete app");

    let secrets = oauth_client_secret::Entity::find()
        .filter(oauth_client_secret::Column::ClientId.eq(&app.client_id))
        .count(db.as_ref())
        .await
        .unwrap();
    let tokens = oauth_token::Entity::find()
        .filter(oauth_token::Column::ClientId.eq(&app.client_id))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(secrets, 0);
    assert_eq!(tokens, 0);

    let err = manager.get_oauth_app(&app.client_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // The other client is untouched
    assert_eq!(manager.list_secret(&other.client_id).await.unwrap().len(), 1);
    let other_tokens = oauth_token::Entity::find()
        .filter(oauth_token::Column::ClientId.eq(&other.client_id))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(other_tokens, 1);

    // Each cascade step is idempotent, so a retry succeeds
    manager
        .delete_oauth_app(&app.client_id)
        .await
        .expect("retry delete");
}
