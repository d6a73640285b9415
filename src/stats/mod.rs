//! Statistical reductions over strided buffers.
//!
//! - [`max`](max::max) family: plain, NaN-ignoring and masked maxima
//! - [`variance`](variance::variance_pn) family: variance, standard deviation
//!   and standard error for four accumulation algorithms, plus [`Moments`] and
//!   [`MeanStdev`]

pub mod max;
pub mod variance;

pub use max::{
    max, max_ndarray, mskmax, mskmax_ndarray, nanmax, nanmax_ndarray, nanmskmax, nanmskmax_ndarray,
};
pub use variance::{
    mean_stdev_pn, mean_stdev_pn_ndarray, mean_variance_pn, mean_variance_pn_ndarray, sem_ch,
    sem_ch_ndarray, sem_mtk, sem_mtk_ndarray, sem_pn, sem_pn_ndarray, sem_wd, sem_wd_ndarray,
    stdev_ch, stdev_ch_ndarray, stdev_mtk, stdev_mtk_ndarray, stdev_pn, stdev_pn_ndarray,
    stdev_wd, stdev_wd_ndarray, variance_ch, variance_ch_ndarray, variance_mtk,
    variance_mtk_ndarray, variance_pn, variance_pn_ndarray, variance_wd, variance_wd_ndarray,
    MeanStdev, Moments,
};
