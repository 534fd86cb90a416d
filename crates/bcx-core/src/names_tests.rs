use crate::NameTable;

#[test]
fn repeat_insertions_share_a_handle() {
    let mut names = NameTable::new();
    let a = names.insert("fact");
    let b = names.insert("main");
    let c = names.insert("fact");

    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(names.len(), 2);
}

#[test]
fn spelling_and_c_name_per_entry() {
    let mut names = NameTable::new();
    let main = names.insert("main");
    assert_eq!(names.spelling(main), "main");
    assert_eq!(names.c_name(main), "b_main");
}

#[test]
fn dots_fold_in_the_c_symbol() {
    let mut names = NameTable::new();
    let rd = names.insert("rd.unit");
    assert_eq!(names.spelling(rd), "rd.unit");
    assert_eq!(names.c_name(rd), "b_rd_unit");
}

#[test]
fn c_keywords_are_defused_by_the_prefix() {
    let mut names = NameTable::new();
    let n = names.insert("int");
    assert_eq!(names.c_name(n), "b_int");
}

#[test]
fn lookup_does_not_insert() {
    let mut names = NameTable::new();
    assert!(names.lookup("putchar").is_none());
    let n = names.insert("putchar");
    assert_eq!(names.lookup("putchar"), Some(n));
    assert_eq!(names.len(), 1);
}

#[test]
fn handles_order_by_first_insertion() {
    let mut names = NameTable::new();
    let first = names.insert("a");
    names.insert("b");
    let again = names.insert("a");
    let third = names.insert("c");
    assert!(first < third);
    assert_eq!(first, again);
}

#[test]
fn empty_table() {
    let names = NameTable::new();
    assert!(names.is_empty());
    assert_eq!(names.len(), 0);
}
