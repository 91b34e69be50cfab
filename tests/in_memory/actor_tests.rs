//! Actor account management through the service layer.

use super::helpers::Harness;
use geotask::access::AccessDenied;
use geotask::domain::Role;
use geotask::services::{ActorChanges, NewActor, ServiceError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_creates_actor_and_duplicate_login_is_refused() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let created = harness
        .actors
        .create(harness.admin.id(), NewActor::new("surveyor", "Sam", Role::Actor))
        .await?;
    assert_eq!(
        harness.actors.get(harness.admin.id(), created.id()).await?,
        created
    );

    let duplicate = harness
        .actors
        .create(harness.admin.id(), NewActor::new("surveyor", "Other", Role::Actor))
        .await;
    let Err(ServiceError::Access(denied)) = duplicate else {
        eyre::bail!("expected a duplicate login denial, got {duplicate:?}");
    };
    assert_eq!(denied, AccessDenied::DuplicateLogin("surveyor".to_owned()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_cannot_create_actor() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let manager = harness.seed_actor("manager", Role::Manager).await?;

    let result = harness
        .actors
        .create(manager.id(), NewActor::new("newbie", "Newbie", Role::Actor))
        .await;
    assert!(matches!(result, Err(ServiceError::Access(_))));
    assert!(harness.repositories.actors.find_by_login("newbie").await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_renames_actor_but_cannot_demote_self() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;

    let renamed = harness
        .actors
        .update(
            harness.admin.id(),
            worker.id(),
            ActorChanges::new().with_login("field-worker").with_role(Role::Manager),
        )
        .await?;
    assert_eq!(renamed.login(), "field-worker");
    assert_eq!(renamed.role(), Role::Manager);
    assert!(
        harness
            .repositories
            .actors
            .find_by_login("field-worker")
            .await?
            .is_some()
    );

    let demotion = harness
        .actors
        .update(
            harness.admin.id(),
            harness.admin.id(),
            ActorChanges::new().with_role(Role::Actor),
        )
        .await;
    assert_eq!(
        demotion.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::SelfRoleChange)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_actor_is_locked_out() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Manager).await?;

    let archived = harness.actors.archive(harness.admin.id(), worker.id()).await?;
    assert!(archived.is_archived());
    assert_eq!(archived.login(), worker.login());

    let listing = harness.actors.list(worker.id()).await;
    assert_eq!(
        listing.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::ArchivedActor(worker.id()))
    );

    let again = harness.actors.archive(harness.admin.id(), worker.id()).await;
    assert!(matches!(again, Err(ServiceError::Access(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_cannot_archive_self() -> eyre::Result<()> {
    let harness = Harness::new().await?;

    let result = harness
        .actors
        .archive(harness.admin.id(), harness.admin.id())
        .await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::SelfArchiveChange)
    );

    let stored = harness
        .repositories
        .actors
        .find_by_id(harness.admin.id())
        .await?
        .ok_or_else(|| eyre::eyre!("admin not stored"))?;
    assert!(!stored.is_archived());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_cannot_hard_delete_self() -> eyre::Result<()> {
    let harness = Harness::new().await?;

    let result = harness
        .actors
        .delete(harness.admin.id(), harness.admin.id())
        .await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::SelfDeletion)
    );
    assert!(
        harness
            .repositories
            .actors
            .find_by_id(harness.admin.id())
            .await?
            .is_some()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_acting_actor_is_denied() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let stranger = geotask::domain::ActorId::new();

    let result = harness.actors.list(stranger).await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::MissingActor)
    );
    Ok(())
}
