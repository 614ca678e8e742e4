mod driver_tests;
