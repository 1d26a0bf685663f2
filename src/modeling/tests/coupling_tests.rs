use crate::error::SimulationError;
use crate::modeling::coupling::Coupling;
use crate::modeling::port::Port;

#[test]
fn test_coupling_between_different_types_is_rejected() {
    let int_from = Port::new::<i32>("integer_port_from");
    let string_from = Port::new::<String>("string_port_from");
    let err = Coupling::new(&int_from, &string_from).unwrap_err();
    assert!(matches!(err, SimulationError::TypeMismatch { .. }));
}

#[test]
fn test_self_coupling_is_rejected() {
    let port = Port::new::<i32>("loop_port");
    let err = Coupling::new(&port, &port).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidCoupling(_)));
}

#[test]
fn test_propagation_and_clear_independence() {
    let from = Port::new::<i32>("integer_port_from");
    let to = Port::new::<i32>("integer_port_to");
    let coupling = Coupling::new(&from, &to).unwrap();

    // propagation copies, it never drains the source
    from.borrow_mut().add_value(1i32).unwrap();
    coupling.propagate_values().unwrap();
    assert_eq!(from.borrow().len(), 1);
    assert_eq!(to.borrow().len(), 1);
    assert_eq!(
        from.borrow().first_value::<i32>().unwrap(),
        to.borrow().first_value::<i32>().unwrap()
    );

    // clearing the source leaves propagated values in the destination
    from.borrow_mut().clear();
    assert_eq!(from.borrow().len(), 0);
    assert_eq!(to.borrow().len(), 1);

    // new values accumulate on top of what was already propagated
    from.borrow_mut().add_values(vec![2i32, 3]).unwrap();
    coupling.propagate_values().unwrap();
    assert_eq!(to.borrow().len(), 3);

    // clearing the destination leaves the source untouched
    to.borrow_mut().clear();
    assert_eq!(from.borrow().len(), 2);
    assert_eq!(to.borrow().len(), 0);

    // propagating twice doubles the destination bag
    coupling.propagate_values().unwrap();
    coupling.propagate_values().unwrap();
    assert_eq!(to.borrow().len(), 2 * from.borrow().len());
    assert_eq!(to.borrow().values::<i32>().unwrap(), vec![2, 3, 2, 3]);
}

#[test]
fn test_coupling_keeps_its_endpoints() {
    let from = Port::new::<String>("string_port_from");
    let to = Port::new::<String>("string_port_to");
    let coupling = Coupling::new(&from, &to).unwrap();
    assert_eq!(coupling.port_from().borrow().name(), "string_port_from");
    assert_eq!(coupling.port_to().borrow().name(), "string_port_to");
}
