use crate::error::SimulationError;
use crate::modeling::port::Port;

#[test]
fn test_new_ports_start_empty() {
    let port1 = Port::new::<i32>("integer_port");
    assert!(port1.borrow().is_empty());
    assert_eq!(port1.borrow().len(), 0);
    let port2 = Port::new::<String>("string_port");
    assert!(port2.borrow().is_empty());
}

#[test]
fn test_port_rejects_values_of_different_type() {
    let port1 = Port::new::<i32>("integer_port");
    let err = port1.borrow_mut().add_value("invalid").unwrap_err();
    assert!(matches!(err, SimulationError::TypeMismatch { .. }));
    let port2 = Port::new::<String>("string_port");
    let err = port2.borrow_mut().add_value(0i32).unwrap_err();
    assert!(matches!(err, SimulationError::TypeMismatch { .. }));
    // a rejected insertion must not touch the bag
    assert!(port1.borrow().is_empty());
    assert!(port2.borrow().is_empty());
}

#[test]
fn test_rejected_bulk_insertion_never_partially_mutates() {
    let port = Port::new::<i32>("integer_port");
    port.borrow_mut().add_value(1i32).unwrap();
    let err = port
        .borrow_mut()
        .add_values(vec!["a".to_string(), "b".to_string()])
        .unwrap_err();
    assert!(matches!(err, SimulationError::TypeMismatch { .. }));
    assert_eq!(port.borrow().len(), 1);
}

#[test]
fn test_port_accepts_values_of_declared_type() {
    let port1 = Port::new::<i32>("integer_port");
    port1.borrow_mut().add_value(1i32).unwrap();
    port1.borrow_mut().add_values(vec![2i32, 3, 4]).unwrap();
    assert_eq!(port1.borrow().len(), 4);

    let port2 = Port::new::<String>("string_port");
    port2.borrow_mut().add_value("Hello".to_string()).unwrap();
    port2
        .borrow_mut()
        .add_values(vec!["World".to_string(), "!".to_string()])
        .unwrap();
    assert_eq!(port2.borrow().len(), 3);
}

#[test]
fn test_first_value_and_values() {
    let port = Port::new::<i32>("integer_port");
    port.borrow_mut().add_values(vec![1i32, 2, 3, 4]).unwrap();
    assert_eq!(port.borrow().first_value::<i32>().unwrap(), 1);
    assert_eq!(port.borrow().values::<i32>().unwrap(), vec![1, 2, 3, 4]);
    // reading with the wrong type fails even though the bag is non-empty
    assert!(matches!(
        port.borrow().first_value::<String>().unwrap_err(),
        SimulationError::TypeMismatch { .. }
    ));
}

#[test]
fn test_clear_empties_the_bag() {
    let port = Port::new::<i32>("integer_port");
    port.borrow_mut().add_values(vec![1i32, 2]).unwrap();
    port.borrow_mut().clear();
    assert!(port.borrow().is_empty());
    assert!(matches!(
        port.borrow().first_value::<i32>().unwrap_err(),
        SimulationError::EmptyPort(_)
    ));
    assert!(port.borrow().values::<i32>().unwrap().is_empty());
    // clearing twice in a row changes nothing
    port.borrow_mut().clear();
    assert!(port.borrow().is_empty());
    // the declared type survives a clear
    port.borrow_mut().add_value(5i32).unwrap();
    assert_eq!(port.borrow().len(), 1);
}

#[test]
fn test_detached_port_has_no_parent() {
    let port = Port::new::<i32>("integer_port");
    assert!(port.borrow().parent().is_none());
}
