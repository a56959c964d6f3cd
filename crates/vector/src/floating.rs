// This software is licensed under a dual license model:
//
// GNU Affero General Public License v3 (AGPLv3): You may use, modify, and
// distribute this software under the terms of the AGPLv3.
//
// Elastic License v2 (ELv2): You may also use, modify, and distribute this
// software under the Elastic License v2, which has specific restrictions.
//
// We welcome any commercial collaboration or support. For inquiries
// regarding the licenses, please contact us at:
// vectorchord-inquiry@tensorchord.ai
//
// Copyright (c) 2025 TensorChord Inc.

use std::cmp::Ordering;

#[inline]
pub fn reduce_sum_of_x2(this: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for &x in this {
        sum += x * x;
    }
    sum
}

#[inline]
pub fn reduce_sum_of_xy(lhs: &[f32], rhs: &[f32]) -> f32 {
    assert_eq!(lhs.len(), rhs.len());
    let n = lhs.len();
    let mut sum = 0.0f32;
    for i in 0..n {
        sum += lhs[i] * rhs[i];
    }
    sum
}

#[inline]
pub fn reduce_sum_of_d2(lhs: &[f32], rhs: &[f32]) -> f32 {
    assert_eq!(lhs.len(), rhs.len());
    let n = lhs.len();
    let mut sum = 0.0f32;
    for i in 0..n {
        let d = lhs[i] - rhs[i];
        sum += d * d;
    }
    sum
}

pub fn reduce_sum_of_xy_sparse<K: Ord>(lidx: &[K], lval: &[f32], ridx: &[K], rval: &[f32]) -> f32 {
    assert_eq!(lidx.len(), lval.len());
    assert_eq!(ridx.len(), rval.len());
    let (mut lp, ln) = (0, lidx.len());
    let (mut rp, rn) = (0, ridx.len());
    let mut sum = 0.0f32;
    while lp < ln && rp < rn {
        match Ord::cmp(&lidx[lp], &ridx[rp]) {
            Ordering::Equal => {
                sum += lval[lp] * rval[rp];
                lp += 1;
                rp += 1;
            }
            Ordering::Less => {
                lp += 1;
            }
            Ordering::Greater => {
                rp += 1;
            }
        }
    }
    sum
}

pub fn reduce_sum_of_d2_sparse<K: Ord>(lidx: &[K], lval: &[f32], ridx: &[K], rval: &[f32]) -> f32 {
    assert_eq!(lidx.len(), lval.len());
    assert_eq!(ridx.len(), rval.len());
    let (mut lp, ln) = (0, lidx.len());
    let (mut rp, rn) = (0, ridx.len());
    let mut sum = 0.0f32;
    while lp < ln && rp < rn {
        match Ord::cmp(&lidx[lp], &ridx[rp]) {
            Ordering::Equal => {
                let d = lval[lp] - rval[rp];
                sum += d * d;
                lp += 1;
                rp += 1;
            }
            Ordering::Less => {
                sum += lval[lp] * lval[lp];
                lp += 1;
            }
            Ordering::Greater => {
                sum += rval[rp] * rval[rp];
                rp += 1;
            }
        }
    }
    for i in lp..ln {
        sum += lval[i] * lval[i];
    }
    for i in rp..rn {
        sum += rval[i] * rval[i];
    }
    sum
}

#[inline]
pub fn vector_add_inplace(lhs: &mut [f32], rhs: &[f32]) {
    assert_eq!(lhs.len(), rhs.len());
    let n = lhs.len();
    for i in 0..n {
        lhs[i] += rhs[i];
    }
}

#[inline]
pub fn vector_mul_scalar_inplace(lhs: &mut [f32], rhs: f32) {
    for x in lhs.iter_mut() {
        *x *= rhs;
    }
}

/// Merges two sorted sparse vectors, dropping entries that cancel out.
pub fn vector_add_sparse<K: Ord + Clone>(
    lidx: &[K],
    lval: &[f32],
    ridx: &[K],
    rval: &[f32],
) -> (Vec<K>, Vec<f32>) {
    assert_eq!(lidx.len(), lval.len());
    assert_eq!(ridx.len(), rval.len());
    let (mut lp, ln) = (0, lidx.len());
    let (mut rp, rn) = (0, ridx.len());
    let mut indexes = Vec::with_capacity(ln + rn);
    let mut values = Vec::with_capacity(ln + rn);
    let mut push = |index: &K, value: f32| {
        if value != 0.0 {
            indexes.push(index.clone());
            values.push(value);
        }
    };
    while lp < ln && rp < rn {
        match Ord::cmp(&lidx[lp], &ridx[rp]) {
            Ordering::Equal => {
                push(&lidx[lp], lval[lp] + rval[rp]);
                lp += 1;
                rp += 1;
            }
            Ordering::Less => {
                push(&lidx[lp], lval[lp]);
                lp += 1;
            }
            Ordering::Greater => {
                push(&ridx[rp], rval[rp]);
                rp += 1;
            }
        }
    }
    for i in lp..ln {
        push(&lidx[i], lval[i]);
    }
    for i in rp..rn {
        push(&ridx[i], rval[i]);
    }
    (indexes, values)
}

#[test]
fn sparse_agrees_with_dense() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..300 {
        let dims = rng.random_range(1..64u32);
        let gen_sparse = |rng: &mut rand::rngs::StdRng| {
            let mut idx = Vec::new();
            let mut val = Vec::new();
            for i in 0..dims {
                if rng.random_bool(0.3) {
                    idx.push(i);
                    val.push(rng.random_range(-8i32..8) as f32);
                }
            }
            (idx, val)
        };
        let densify = |idx: &[u32], val: &[f32]| {
            let mut dense = vec![0.0f32; dims as usize];
            for (&i, &v) in idx.iter().zip(val) {
                dense[i as usize] = v;
            }
            dense
        };
        let (li, lv) = gen_sparse(&mut rng);
        let (ri, rv) = gen_sparse(&mut rng);
        let (l, r) = (densify(&li, &lv), densify(&ri, &rv));
        assert_eq!(
            reduce_sum_of_xy_sparse(&li, &lv, &ri, &rv),
            reduce_sum_of_xy(&l, &r)
        );
        assert_eq!(
            reduce_sum_of_d2_sparse(&li, &lv, &ri, &rv),
            reduce_sum_of_d2(&l, &r)
        );
        let (si, sv) = vector_add_sparse(&li, &lv, &ri, &rv);
        assert!(sv.iter().all(|&x| x != 0.0));
        let mut sum = l.clone();
        vector_add_inplace(&mut sum, &r);
        assert_eq!(densify(&si, &sv), sum);
    }
}
