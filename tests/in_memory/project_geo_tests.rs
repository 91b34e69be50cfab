//! Projects, membership and geos through the service layer.

use super::helpers::Harness;
use geotask::access::AccessDenied;
use geotask::domain::Role;
use geotask::services::{GeoChanges, NewGeo, NewProject, ProjectChanges, ServiceError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actor_without_privilege_cannot_create_project() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;

    let result = harness
        .projects
        .create(worker.id(), NewProject::new("Private survey"))
        .await;
    assert!(matches!(result, Err(ServiceError::Access(_))));
    assert!(harness.projects.list(worker.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_manager_edits_and_archives_project() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Actor).await?;
    let project = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;

    let renamed = harness
        .projects
        .update(
            lead.id(),
            project.id(),
            ProjectChanges::new().with_title("River basin phase 2"),
        )
        .await?;
    assert_eq!(renamed.title(), "River basin phase 2");

    let archived = harness.projects.archive(lead.id(), project.id()).await?;
    let mut expected = renamed.clone();
    expected.set_archived(true);
    assert_eq!(archived, expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_manager_cannot_hard_delete_project() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Manager).await?;
    let project = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;

    let result = harness.projects.delete(lead.id(), project.id()).await;
    let reasons = result
        .err()
        .as_ref()
        .and_then(ServiceError::as_denied)
        .map(AccessDenied::reasons)
        .unwrap_or_default();
    assert_eq!(reasons, vec!["permanently delete project requires the admin role"]);
    assert!(
        harness
            .repositories
            .projects
            .find_by_id(project.id())
            .await?
            .is_some()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_cannot_demote_self_in_project() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Actor).await?;
    let project = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;

    let result = harness
        .projects
        .assign_role(lead.id(), project.id(), lead.id(), Role::Actor)
        .await;
    assert!(matches!(result, Err(ServiceError::Access(_))));

    let removed = harness
        .projects
        .remove_member(harness.admin.id(), project.id(), lead.id())
        .await?;
    assert_eq!(removed.role_of(lead.id()), None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn geo_joins_project_layers_and_cannot_move() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let other = harness.seed_project(&[]).await?;

    let geo = harness
        .geos
        .create(harness.admin.id(), NewGeo::new(project.id(), "Floodplain"))
        .await?;
    let stored = harness.projects.get(harness.admin.id(), project.id()).await?;
    assert!(stored.layers().contains(&geo.id()));
    assert_eq!(
        harness
            .geos
            .list_by_project(harness.admin.id(), project.id())
            .await?,
        vec![geo.clone()]
    );

    let moved = harness
        .geos
        .update(
            harness.admin.id(),
            geo.id(),
            GeoChanges::new().with_project(other.id()),
        )
        .await;
    assert_eq!(
        moved.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::ProjectChangeForbidden)
    );

    let retitled = harness
        .geos
        .update(
            harness.admin.id(),
            geo.id(),
            GeoChanges::new().with_title("Upper floodplain"),
        )
        .await?;
    assert_eq!(retitled.title(), "Upper floodplain");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn geo_archive_is_refused_twice() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let geo = harness
        .geos
        .create(harness.admin.id(), NewGeo::new(project.id(), "Dune field"))
        .await?;

    let archived = harness.geos.archive(harness.admin.id(), geo.id()).await?;
    assert!(archived.is_archived());
    let again = harness.geos.archive(harness.admin.id(), geo.id()).await;
    assert!(matches!(again, Err(ServiceError::Access(_))));
    Ok(())
}
