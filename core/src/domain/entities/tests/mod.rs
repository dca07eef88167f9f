mod personal_access_token_tests;
