mod delete_test;
mod get_test;
mod put_test;
