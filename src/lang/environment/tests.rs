use pretty_assertions::assert_eq;
use super::*;

#[test]
pub fn test_lookup_walks_outward() {
    let global = Environment::new_global(AssignPolicy::default());
    global.borrow_mut().define("x", Value::Int(1));

    let local = Environment::new_with_parent(Rc::clone(&global));

    assert_eq!(Some(Value::Int(1)), local.borrow().get("x"));
    assert!(local.borrow().has_variable("x"));
    assert_eq!(None, local.borrow().get_local("x"));
}

#[test]
pub fn test_missing_binding() {
    let global = Environment::new_global(AssignPolicy::default());
    let local = Environment::new_with_parent(Rc::clone(&global));

    assert_eq!(None, local.borrow().get("y"));
    assert!(!local.borrow().has_variable("y"));
}

#[test]
pub fn test_define_shadows() {
    let global = Environment::new_global(AssignPolicy::default());
    global.borrow_mut().define("x", Value::Int(1));

    let local = Environment::new_with_parent(Rc::clone(&global));
    local.borrow_mut().define("x", Value::Int(2));

    assert_eq!(Some(Value::Int(2)), local.borrow().get("x"));
    assert_eq!(Some(Value::Int(1)), global.borrow().get("x"));
}

#[test]
pub fn test_assign_updates_nearest_binding() {
    let global = Environment::new_global(AssignPolicy::default());
    global.borrow_mut().define("x", Value::Int(1));

    let local = Environment::new_with_parent(Rc::clone(&global));
    assert!(local.borrow_mut().assign("x", Value::Int(5)).is_ok());

    assert_eq!(Some(Value::Int(5)), global.borrow().get("x"));
    assert_eq!(None, local.borrow().get_local("x"));
}

#[test]
pub fn test_assign_defines_in_innermost_environment() {
    let global = Environment::new_global(AssignPolicy::DefineInnermost);
    let local = Environment::new_with_parent(Rc::clone(&global));

    assert!(local.borrow_mut().assign("fresh", Value::from("new")).is_ok());

    assert_eq!(Some(&Value::from("new")), local.borrow().get_local("fresh"));
    assert_eq!(None, global.borrow().get("fresh"));
}

#[test]
pub fn test_strict_policy_rejects_unbound_assignment() {
    let global = Environment::new_global(AssignPolicy::Strict);
    let local = Environment::new_with_parent(Rc::clone(&global));

    assert_eq!(AssignPolicy::Strict, local.borrow().policy());
    assert!(matches!(local.borrow_mut().assign("fresh", Value::Int(1)), Err(RuntimeError::UndefinedVariable(name)) if name == "fresh"));
    assert!(!local.borrow().has_variable("fresh"));
}

#[test]
pub fn test_strict_policy_still_updates_existing_bindings() {
    let global = Environment::new_global(AssignPolicy::Strict);
    global.borrow_mut().define("x", Value::Int(1));

    assert!(global.borrow_mut().assign("x", Value::Int(2)).is_ok());
    assert_eq!(Some(Value::Int(2)), global.borrow().get("x"));
}
