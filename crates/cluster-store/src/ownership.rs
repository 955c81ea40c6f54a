//! Owner references for dependent objects
//!
//! Dependents carry a single controller owner reference pointing at their Web.
//! The API server's garbage collector deletes them once the owner is gone; the
//! controller never deletes anything itself.

use crate::error::StoreError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;

/// Marks `child` as controlled by `owner`.
///
/// Fails when the owner has not been persisted yet (no name or uid), when the
/// two objects live in different namespaces, or when `child` is already
/// controlled by a different object. Re-applying the same owner is a no-op.
pub fn set_controller_reference<O>(owner: &O, child: &mut ObjectMeta) -> Result<(), StoreError>
where
    O: Resource<DynamicType = ()>,
{
    let owner_meta = owner.meta();
    let owner_name = owner_meta.name.as_deref().unwrap_or("<unnamed>");

    let mut owner_ref = owner.controller_owner_ref(&()).ok_or_else(|| {
        StoreError::Ownership(format!(
            "{} {} has no name or uid; cannot be used as owner",
            O::kind(&()),
            owner_name
        ))
    })?;
    owner_ref.block_owner_deletion = Some(true);

    if let (Some(owner_ns), Some(child_ns)) =
        (owner_meta.namespace.as_deref(), child.namespace.as_deref())
    {
        if owner_ns != child_ns {
            return Err(StoreError::Ownership(format!(
                "cross-namespace owner references are not allowed: owner {}/{} and child in {}",
                owner_ns, owner_name, child_ns
            )));
        }
    }

    let refs = child.owner_references.get_or_insert_with(Vec::new);
    if let Some(existing) = refs.iter().find(|r| r.controller == Some(true)) {
        if existing.uid != owner_ref.uid {
            return Err(StoreError::Ownership(format!(
                "object is already controlled by {} {}",
                existing.kind, existing.name
            )));
        }
    }

    refs.retain(|r| r.uid != owner_ref.uid);
    refs.push(owner_ref);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{Web, WebSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

    fn persisted_web(name: &str, namespace: &str, uid: &str) -> Web {
        let mut web = Web::new(name, WebSpec::default());
        web.metadata.namespace = Some(namespace.to_string());
        web.metadata.uid = Some(uid.to_string());
        web
    }

    fn child_meta(namespace: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some("child".to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sets_controller_reference() {
        let web = persisted_web("site", "ns", "uid-1");
        let mut meta = child_meta("ns");

        set_controller_reference(&web, &mut meta).unwrap();

        let refs = meta.owner_references.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, "Web");
        assert_eq!(refs[0].api_version, "epam.com/v1alpha1");
        assert_eq!(refs[0].name, "site");
        assert_eq!(refs[0].uid, "uid-1");
        assert_eq!(refs[0].controller, Some(true));
        assert_eq!(refs[0].block_owner_deletion, Some(true));
    }

    #[test]
    fn test_reapplying_same_owner_is_idempotent() {
        let web = persisted_web("site", "ns", "uid-1");
        let mut meta = child_meta("ns");

        set_controller_reference(&web, &mut meta).unwrap();
        set_controller_reference(&web, &mut meta).unwrap();

        assert_eq!(meta.owner_references.unwrap().len(), 1);
    }

    #[test]
    fn test_owner_without_uid_is_rejected() {
        let mut web = Web::new("site", WebSpec::default());
        web.metadata.namespace = Some("ns".to_string());
        let mut meta = child_meta("ns");

        let err = set_controller_reference(&web, &mut meta).unwrap_err();
        assert!(matches!(err, StoreError::Ownership(_)));
        assert!(meta.owner_references.is_none());
    }

    #[test]
    fn test_cross_namespace_owner_is_rejected() {
        let web = persisted_web("site", "ns", "uid-1");
        let mut meta = child_meta("other");

        let err = set_controller_reference(&web, &mut meta).unwrap_err();
        assert!(matches!(err, StoreError::Ownership(_)));
    }

    #[test]
    fn test_child_controlled_by_another_owner_is_rejected() {
        let web = persisted_web("site", "ns", "uid-1");
        let mut meta = child_meta("ns");
        meta.owner_references = Some(vec![OwnerReference {
            api_version: "apps/v1".to_string(),
            kind: "ReplicaSet".to_string(),
            name: "someone-else".to_string(),
            uid: "uid-2".to_string(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }]);

        let err = set_controller_reference(&web, &mut meta).unwrap_err();
        assert!(err.to_string().contains("someone-else"));
    }

    #[test]
    fn test_non_controller_references_are_kept() {
        let web = persisted_web("site", "ns", "uid-1");
        let mut meta = child_meta("ns");
        meta.owner_references = Some(vec![OwnerReference {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            name: "bundle".to_string(),
            uid: "uid-3".to_string(),
            controller: None,
            block_owner_deletion: None,
        }]);

        set_controller_reference(&web, &mut meta).unwrap();

        let refs = meta.owner_references.unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[1].uid, "uid-1");
    }
}
