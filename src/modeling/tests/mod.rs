mod coupling_tests;
mod port_tests;
