//! Pass-through properties of the forwarders, driven through the C probes

use core::ffi::{c_char, c_int, c_ulong, c_void};
use std::ffi::{CStr, CString};

use devaarg::ffi::{charp_charp, charp_int, charp_ulint, charp_voidp};
use devaarg::{forward_arg, forward_charp, forward_int, forward_ulint, forward_voidp, probes};
use devaarg::{Handle, TrailingArg};
use proptest::prelude::*;

fn tag() -> &'static CStr {
    CStr::from_bytes_with_nul(b"tag\0").unwrap()
}

proptest! {
    #[test]
    fn int_passes_through(value in any::<c_int>()) {
        let handle = unsafe { forward_int(probes::int_identity(), tag().as_ptr(), value) };
        prop_assert_eq!(handle.as_isize(), value as isize);
        prop_assert_eq!(handle.status(), value);
    }

    #[test]
    fn ulint_passes_through(value in any::<c_ulong>()) {
        let handle = unsafe { forward_ulint(probes::ulint_identity(), tag().as_ptr(), value) };
        prop_assert_eq!(handle.addr() as c_ulong, value);
    }

    #[test]
    fn charp_reaches_callee(text in "[a-zA-Z0-9 ]{0,64}") {
        let value = CString::new(text.clone()).unwrap();
        let handle = unsafe { forward_charp(probes::charp_len(), tag().as_ptr(), value.as_ptr()) };
        prop_assert_eq!(handle.addr(), text.len());
        prop_assert_eq!(value.to_str().unwrap(), text.as_str());
    }

    #[test]
    fn voidp_passes_through(addr in any::<usize>()) {
        let ptr = addr as *mut c_void;
        let handle = unsafe { forward_voidp(probes::voidp_identity(), tag().as_ptr(), ptr) };
        prop_assert_eq!(handle, Handle::from_ptr(ptr));
    }

    #[test]
    fn first_passes_through(first in "[a-z]{1,16}", value in any::<c_int>()) {
        let first = CString::new(first).unwrap();
        let handle = unsafe { forward_int(probes::first_echo(), first.as_ptr(), value) };
        prop_assert_eq!(handle.as_ptr() as *const c_char, first.as_ptr());
    }

    #[test]
    fn tagged_matches_typed(value in any::<c_int>()) {
        let typed = unsafe { forward_int(probes::int_identity(), tag().as_ptr(), value) };
        let tagged = unsafe { forward_arg(probes::int_identity(), tag().as_ptr(), TrailingArg::Int(value)) };
        prop_assert_eq!(typed, tagged);
    }

    #[test]
    fn exports_match_adapters(value in any::<c_ulong>()) {
        let exported = unsafe { charp_ulint(Some(probes::ulint_identity()), tag().as_ptr(), value) };
        let adapted = unsafe { forward_ulint(probes::ulint_identity(), tag().as_ptr(), value) };
        prop_assert_eq!(Handle::from_ptr(exported), adapted);
    }
}

#[test]
fn scenario_int_42() {
    let x = CStr::from_bytes_with_nul(b"x\0").unwrap();
    let handle = unsafe { forward_int(probes::int_identity(), x.as_ptr(), 42) };
    assert_eq!(handle, Handle::from_addr(42));
}

#[test]
fn scenario_hello_length() {
    let ignored = CStr::from_bytes_with_nul(b"ignored\0").unwrap();
    let hello = CStr::from_bytes_with_nul(b"hello\0").unwrap();
    let handle = unsafe { forward_charp(probes::charp_len(), ignored.as_ptr(), hello.as_ptr()) };
    assert_eq!(handle.addr(), 5);
}

#[test]
fn scenario_pointer_identity() {
    let mut some = String::from("some value");
    let ptr = (&mut some as *mut String).cast::<c_void>();
    let handle = unsafe { forward_voidp(probes::voidp_identity(), tag().as_ptr(), ptr) };
    assert_eq!(handle.as_ptr(), ptr);
    assert_eq!(some, "some value");
}

#[test]
fn scenario_ulint_max() {
    let handle = unsafe { forward_ulint(probes::ulint_identity(), tag().as_ptr(), c_ulong::MAX) };
    assert_eq!(handle.addr() as c_ulong, c_ulong::MAX);
}

#[test]
fn exported_symbols_with_null_callback() {
    unsafe {
        assert!(charp_charp(None, tag().as_ptr(), tag().as_ptr()).is_null());
        assert!(charp_int(None, tag().as_ptr(), 42).is_null());
        assert!(charp_ulint(None, tag().as_ptr(), 42).is_null());
        assert!(charp_voidp(None, tag().as_ptr(), core::ptr::null_mut()).is_null());
    }
}

#[test]
fn forwarding_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let first = CString::new(format!("thread-{}", i)).unwrap();
                (0..1000).all(|n: c_int| {
                    let h = unsafe { forward_int(probes::int_identity(), first.as_ptr(), n * i) };
                    h.status() == n * i
                })
            })
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap());
    }
}

#[test]
fn self_check_passes() {
    assert!(probes::self_check().is_ok());
}
