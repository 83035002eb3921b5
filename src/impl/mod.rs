// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod config_ron_datasource;
        pub(crate) mod obras_csv_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod config_model;
        pub(crate) mod dmy_date_model;
        pub(crate) mod fee_amount_model;
        pub(crate) mod obra_row_model;
        pub(crate) mod payment_status_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod work_record_store_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod analysis_result;
        pub(crate) mod engineer_routing;
        pub(crate) mod period;
        pub(crate) mod work_record;
    }
    pub(crate) mod logic {
        pub(crate) mod engineer_attributor;
        pub(crate) mod fee_aggregator;
        pub(crate) mod fee_partitioner;
        pub(crate) mod period_closer;
    }
    pub(crate) mod repositories {
        pub(crate) mod work_record_store;
    }
    pub(crate) mod usecases {
        pub(crate) mod analyze_usecase;
    }
    #[cfg(test)]
    pub(crate) mod fixtures;
}

pub(crate) mod presentation {
    pub(crate) mod report_exporter;
    pub(crate) mod report_sheet;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::analysis_result::*;
        pub use crate::domain::entities::engineer_routing::*;
        pub use crate::domain::entities::period::*;
        pub use crate::domain::entities::work_record::*;
    }

    pub mod store {
        pub use crate::data::repositories::work_record_store_impl::SheetWorkRecordStore;
        pub use crate::domain::repositories::work_record_store::*;
    }

    pub mod usecases {
        pub use crate::domain::usecases::analyze_usecase::AnalyzeUsecase;
    }
}
