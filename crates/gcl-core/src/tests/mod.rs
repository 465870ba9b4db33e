mod oracle_tests;
