mod prediction_tests;
