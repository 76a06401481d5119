//! Integration tests for role hierarchies
//!
//! Builds an organizational hierarchy with layered permissions and verifies
//! inheritance, structural changes, snapshot restore and persistence hand-off.

use cretoai_rbac::{
    MemoryStorage, Permission, RbacError, Registry, RegistrySnapshot, Role, Storage,
};
use std::collections::HashSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Route engine logs to the test writer, filtered by `RUST_LOG`
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn id(s: &str) -> String {
    s.to_string()
}

fn layer(s: &str) -> Permission {
    Permission::layered(s.to_string(), "::")
}

/// ceo inherits from both VPs; vp_engineering and director_backend inherit
/// from engineer
fn create_organizational_hierarchy() -> anyhow::Result<Registry> {
    init_tracing();
    let registry = Registry::new();

    registry.add(Role::with_permissions(id("ceo"), vec![layer("company")]))?;
    registry.add(Role::with_permissions(id("vp_engineering"), vec![layer("engineering")]))?;
    registry.add(Role::with_permissions(id("vp_sales"), vec![layer("sales")]))?;
    registry.add(Role::with_permissions(
        id("director_backend"),
        vec![layer("engineering::backend"), Permission::new(id("hire"))],
    ))?;
    registry.add(Role::with_permissions(
        id("engineer"),
        vec![layer("engineering::backend::deploy"), Permission::new(id("oncall"))],
    ))?;

    // Grants flow from parent to child
    registry.set_parents(&id("vp_engineering"), [id("engineer")])?;
    registry.set_parents(&id("director_backend"), [id("engineer")])?;
    registry.set_parents(&id("ceo"), [id("vp_engineering"), id("vp_sales")])?;

    registry.check_cycles()?;
    Ok(registry)
}

#[test]
fn test_hierarchy_grants() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;

    // Direct layered grant covers sub-permissions
    assert!(registry.is_granted(&id("vp_sales"), &layer("sales::pipeline")));

    // Ancestor grants are inherited
    assert!(registry.is_granted(&id("ceo"), &layer("sales::pipeline")));
    assert!(registry.is_granted(&id("ceo"), &layer("engineering::backend::deploy")));
    assert!(registry.is_granted(&id("director_backend"), &layer("engineering::backend::deploy")));

    // Layered matching is not upward
    assert!(!registry.is_granted(&id("engineer"), &layer("engineering::backend")));
    assert!(!registry.is_granted(&id("engineer"), &layer("engineering")));

    // Simple permissions never match by prefix
    assert!(registry.is_granted(&id("director_backend"), &Permission::new(id("hire"))));
    assert!(!registry.is_granted(&id("director_backend"), &layer("hire::senior")));

    Ok(())
}

#[test]
fn test_any_all_over_hierarchy() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;
    let vps = [id("vp_engineering"), id("vp_sales")];

    assert!(!registry.all_granted(&vps, &layer("engineering::backend::deploy::canary")));
    assert!(registry.any_granted(&vps, &layer("sales::forecast")));
    assert!(!registry.all_granted(&vps, &layer("sales::forecast")));
    assert!(registry.all_granted(
        &[id("ceo"), id("vp_engineering")],
        &layer("engineering::backend::deploy")
    ));

    Ok(())
}

#[test]
fn test_revoke_propagates_to_descendants() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;
    let oncall = Permission::new(id("oncall"));

    let (engineer, _) = registry.get(&id("engineer"))?;
    assert!(registry.is_granted(&id("ceo"), &oncall));
    assert!(registry.is_granted(&id("director_backend"), &oncall));

    engineer.revoke(&id("oncall"));
    assert!(!registry.is_granted(&id("ceo"), &oncall));
    assert!(!registry.is_granted(&id("director_backend"), &oncall));

    // Revoking twice is a no-op
    assert!(!engineer.revoke(&id("oncall")));

    Ok(())
}

#[test]
fn test_remove_role_detaches_inheritance() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;

    let removed = registry.remove(&id("vp_sales"))?;
    assert!(removed.permit(&layer("sales::pipeline")));

    assert!(!registry.is_granted(&id("ceo"), &layer("sales::pipeline")));
    assert_eq!(registry.get_parents(&id("ceo"))?, HashSet::from([id("vp_engineering")]));
    assert!(matches!(registry.get(&id("vp_sales")), Err(RbacError::RoleNotFound(_))));

    Ok(())
}

#[test]
fn test_cycle_then_repair() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;

    // Not rejected when added
    registry.set_parents(&id("engineer"), [id("ceo")])?;
    let err = registry.check_cycles().unwrap_err();
    assert!(matches!(err, RbacError::CycleDetected { .. }));
    assert!(err.to_string().contains("engineer"));

    registry.remove_parent(&id("engineer"), &id("ceo"))?;
    registry.check_cycles()?;

    Ok(())
}

#[test]
fn test_snapshot_restore() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;
    let snapshot = registry.snapshot();
    assert_eq!(snapshot.roles.len(), 5);
    assert_eq!(snapshot.edges.len(), 4);

    let json = serde_json::to_string(&snapshot)?;
    let decoded: RegistrySnapshot = serde_json::from_str(&json)?;
    let restored = Registry::from_snapshot(decoded)?;

    for role in registry.role_ids() {
        assert_eq!(restored.get_parents(&role)?, registry.get_parents(&role)?);
    }
    assert!(restored.is_granted(&id("ceo"), &layer("engineering::backend::deploy")));
    restored.check_cycles()?;

    // Restored registry is independent of the original
    registry.remove(&id("engineer"))?;
    assert!(restored.contains(&id("engineer")));

    Ok(())
}

#[test]
fn test_storage_handoff() -> anyhow::Result<()> {
    let registry = create_organizational_hierarchy()?;
    let store: MemoryStorage = MemoryStorage::new();

    for role_id in registry.role_ids() {
        let (role, _) = registry.get(&role_id)?;
        let record = store.convert(&*role)?;
        store.save(record)?;
    }
    assert_eq!(store.len(), registry.len());

    let records = store.get_by(&[id("engineer"), id("ceo")])?;
    assert_eq!(records[0].id, "engineer");
    assert_eq!(records[1].id, "ceo");

    let err = store.get_by(&[id("intern")]).unwrap_err();
    assert_eq!(err, RbacError::RoleNotFound(id("intern")));

    Ok(())
}

#[test]
fn test_numeric_identifiers() -> anyhow::Result<()> {
    let registry: Registry<u64, u32> = Registry::new();

    registry.add(Role::<u64, u32>::with_permissions(1, vec![Permission::new(100)]))?;
    registry.add(Role::<u64, u32>::new(2))?;
    registry.set_parents(&2, [1])?;

    assert!(registry.is_granted(&2, &Permission::new(100)));
    assert!(!registry.is_granted(&1, &Permission::new(101)));
    assert_eq!(registry.remove(&3).unwrap_err(), RbacError::RoleNotFound("3".to_string()));

    Ok(())
}
