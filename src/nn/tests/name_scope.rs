use crate::nn::NameScope;

#[test]
fn test_root_scope_has_no_prefix() {
    let root = NameScope::root();
    assert!(root.is_root());
    assert_eq!(root.name("conv1"), "conv1");
    assert_eq!(NameScope::new(None), root);
    assert_eq!(NameScope::new(Some("")), root);
    assert_eq!(NameScope::new(Some("/")), root);
}

#[test]
fn test_nested_scopes() {
    let scope = NameScope::new(Some("net1"));
    assert_eq!(scope.prefix(), Some("net1"));
    assert_eq!(scope.name("conv1"), "net1/conv1");

    let block = scope.sub("rconv1");
    assert_eq!(block.name("w1"), "net1/rconv1/w1");
    assert_eq!(block.sub("norm1").name("beta"), "net1/rconv1/norm1/beta");
}

#[test]
fn test_surrounding_slashes_are_trimmed() {
    let scope = NameScope::new(Some("/swa_model/"));
    assert_eq!(scope.name("w"), "swa_model/w");
    assert_eq!(scope.to_string(), "swa_model");
}
