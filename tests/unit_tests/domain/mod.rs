mod model_comparison_test;
