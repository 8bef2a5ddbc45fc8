//! Supplier analytics and reporting
//!
//! This module provides analytics capabilities for supplier performance,
//! trends analysis, and business intelligence reporting.

use super::model::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supplier analytics dashboard data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDashboard {
    pub total_suppliers: i64,
    pub active_suppliers: i64,
    pub pending_suppliers: i64,
    pub suspended_suppliers: i64,
    pub average_rating: Option<f64>,
    pub top_categories: Vec<CategorySummary>,
    pub performance_trends: Vec<PerformanceTrend>,
    pub suppliers_requiring_attention: Vec<SupplierSummary>,
    pub recent_additions: Vec<SupplierSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: SupplierCategory,
    pub count: i64,
    pub percentage: f64,
    pub average_rating: Option<f64>,
    pub total_spend: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceTrend {
    pub period: String,
    pub average_rating: f64,
    pub on_time_delivery_rate: f64,
    pub total_orders: i32,
    pub total_spend: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRiskAnalysis {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub risk_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor_type: RiskFactorType,
    pub severity: RiskSeverity,
    pub description: String,
    pub impact_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RiskFactorType {
    LowRating,
    PoorDeliveryPerformance,
    HighDefectRate,
    PaymentDelays,
    SingleSourceDependency,
    GeographicalRisk,
    FinancialInstability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierComparisonReport {
    pub suppliers: Vec<SupplierComparison>,
    pub metrics: ComparisonMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierComparison {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub rating: Option<f64>,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating: Option<f64>,
    pub total_orders: i32,
    pub total_spend: i64,
    pub lead_time_days: Option<i32>,
    pub defect_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub best_rating: f64,
    pub worst_rating: f64,
    pub average_rating: f64,
    pub best_delivery_rate: f64,
    pub worst_delivery_rate: f64,
    pub average_delivery_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPerformanceReport {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub reporting_period: DateRange,
    pub overall_score: f64,
    pub delivery_metrics: DeliveryMetrics,
    pub quality_metrics: QualityMetrics,
    pub financial_metrics: FinancialMetrics,
    pub compliance_metrics: ComplianceMetrics,
    pub trends: Vec<MonthlyTrend>,
    pub improvement_areas: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub total_orders: i32,
    pub on_time_deliveries: i32,
    pub late_deliveries: i32,
    pub early_deliveries: i32,
    pub on_time_rate: f64,
    pub average_lead_time: f64,
    pub lead_time_variance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub quality_rating: f64,
    pub defect_rate: f64,
    pub return_rate: f64,
    pub quality_incidents: i32,
    pub corrective_actions: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub total_spend: i64,
    pub average_order_value: i64,
    pub payment_terms_compliance: f64,
    pub early_payment_discounts_taken: i64,
    pub cost_savings_achieved: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    pub documentation_compliance: f64,
    pub certification_status: bool,
    pub audit_score: Option<f64>,
    pub regulatory_violations: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub orders: i32,
    pub on_time_rate: f64,
    pub quality_score: f64,
    pub spend: i64,
}

/// Supplier analytics engine
pub trait SupplierAnalytics: Send + Sync {
    /// Generate supplier dashboard data
    fn generate_dashboard(&self, tenant_id: Uuid) -> impl std::future::Future<Output = SupplierDashboard> + Send;

    /// Analyze supplier risk factors
    fn analyze_supplier_risk(&self, tenant_id: Uuid, supplier_id: Uuid) -> impl std::future::Future<Output = SupplierRiskAnalysis> + Send;

    /// Generate supplier comparison report
    fn generate_comparison_report(&self, tenant_id: Uuid, supplier_ids: Vec<Uuid>) -> impl std::future::Future<Output = SupplierComparisonReport> + Send;

    /// Generate detailed performance report for a supplier
    fn generate_performance_report(&self, tenant_id: Uuid, supplier_id: Uuid, date_range: DateRange) -> impl std::future::Future<Output = SupplierPerformanceReport> + Send;

    /// Calculate supplier performance score
    fn calculate_performance_score(&self, performance: &SupplierPerformance) -> f64;

    /// Identify suppliers requiring attention
    fn identify_suppliers_needing_attention(&self, tenant_id: Uuid) -> impl std::future::Future<Output = Vec<SupplierSummary>> + Send;

    /// Generate trend analysis
    fn analyze_performance_trends(&self, tenant_id: Uuid, months: i32) -> impl std::future::Future<Output = Vec<PerformanceTrend>> + Send;

    /// Calculate category distribution
    fn calculate_category_distribution(&self, tenant_id: Uuid) -> impl std::future::Future<Output = Vec<CategorySummary>> + Send;
}

pub struct DefaultSupplierAnalytics;

impl DefaultSupplierAnalytics {
    pub fn new() -> Self {
        Self
    }
}

impl SupplierAnalytics for DefaultSupplierAnalytics {
    async fn generate_dashboard(&self, _tenant_id: Uuid) -> SupplierDashboard {
        // Mock implementation - in production this would query the database
        SupplierDashboard {
            total_suppliers: 150,
            active_suppliers: 120,
            pending_suppliers: 20,
            suspended_suppliers: 10,
            average_rating: Some(4.2),
            top_categories: vec![
                CategorySummary {
                    category: SupplierCategory::Technology,
                    count: 45,
                    percentage: 30.0,
                    average_rating: Some(4.5),
                    total_spend: 2500000, // $25,000 in cents
                },
                CategorySummary {
                    category: SupplierCategory::Manufacturing,
                    count: 35,
                    percentage: 23.3,
                    average_rating: Some(4.1),
                    total_spend: 1800000, // $18,000 in cents
                },
            ],
            performance_trends: vec![
                PerformanceTrend {
                    period: "2024-01".to_string(),
                    average_rating: 4.1,
                    on_time_delivery_rate: 0.85,
                    total_orders: 450,
                    total_spend: 1200000,
                },
                PerformanceTrend {
                    period: "2024-02".to_string(),
                    average_rating: 4.2,
                    on_time_delivery_rate: 0.87,
                    total_orders: 480,
                    total_spend: 1350000,
                },
            ],
            suppliers_requiring_attention: Vec::new(),
            recent_additions: Vec::new(),
        }
    }

    async fn analyze_supplier_risk(&self, _tenant_id: Uuid, supplier_id: Uuid) -> SupplierRiskAnalysis {
        // Mock implementation
        SupplierRiskAnalysis {
            supplier_id,
            supplier_name: "Example Supplier".to_string(),
            risk_score: 6.5,
            risk_factors: vec![
                RiskFactor {
                    factor_type: RiskFactorType::PoorDeliveryPerformance,
                    severity: RiskSeverity::Medium,
                    description: "On-time delivery rate below 85%".to_string(),
                    impact_score: 3.2,
                },
            ],
            recommendations: vec![
                "Implement delivery performance improvement plan".to_string(),
                "Conduct supplier capability assessment".to_string(),
            ],
        }
    }

    async fn generate_comparison_report(&self, _tenant_id: Uuid, supplier_ids: Vec<Uuid>) -> SupplierComparisonReport {
        // Mock implementation
        let suppliers = supplier_ids.into_iter().map(|id| SupplierComparison {
            supplier_id: id,
            supplier_name: format!("Supplier {}", id.as_simple()),
            rating: Some(4.0),
            on_time_delivery_rate: Some(0.85),
            quality_rating: Some(4.2),
            total_orders: 100,
            total_spend: 500000,
            lead_time_days: Some(14),
            defect_rate: Some(0.02),
        }).collect();

        SupplierComparisonReport {
            suppliers,
            metrics: ComparisonMetrics {
                best_rating: 4.8,
                worst_rating: 3.2,
                average_rating: 4.1,
                best_delivery_rate: 0.95,
                worst_delivery_rate: 0.75,
                average_delivery_rate: 0.85,
            },
        }
    }

    async fn generate_performance_report(&self, _tenant_id: Uuid, supplier_id: Uuid, date_range: DateRange) -> SupplierPerformanceReport {
        // Mock implementation
        SupplierPerformanceReport {
            supplier_id,
            supplier_name: "Example Supplier Ltd.".to_string(),
            reporting_period: date_range,
            overall_score: 8.2,
            delivery_metrics: DeliveryMetrics {
                total_orders: 120,
                on_time_deliveries: 102,
                late_deliveries: 15,
                early_deliveries: 3,
                on_time_rate: 0.85,
                average_lead_time: 12.5,
                lead_time_variance: 2.1,
            },
            quality_metrics: QualityMetrics {
                quality_rating: 4.3,
                defect_rate: 0.015,
                return_rate: 0.008,
                quality_incidents: 2,
                corrective_actions: 2,
            },
            financial_metrics: FinancialMetrics {
                total_spend: 2500000, // $25,000 in cents
                average_order_value: 20833, // ~$208.33 in cents
                payment_terms_compliance: 0.95,
                early_payment_discounts_taken: 12500, // $125 in cents
                cost_savings_achieved: 75000, // $750 in cents
            },
            compliance_metrics: ComplianceMetrics {
                documentation_compliance: 0.98,
                certification_status: true,
                audit_score: Some(8.7),
                regulatory_violations: 0,
            },
            trends: vec![
                MonthlyTrend {
                    month: "January".to_string(),
                    orders: 40,
                    on_time_rate: 0.82,
                    quality_score: 4.1,
                    spend: 800000,
                },
                MonthlyTrend {
                    month: "February".to_string(),
                    orders: 38,
                    on_time_rate: 0.86,
                    quality_score: 4.3,
                    spend: 850000,
                },
                MonthlyTrend {
                    month: "March".to_string(),
                    orders: 42,
                    on_time_rate: 0.88,
                    quality_score: 4.5,
                    spend: 850000,
                },
            ],
            improvement_areas: vec![
                "Reduce lead time variability".to_string(),
                "Improve on-time delivery rate to above 90%".to_string(),
            ],
            strengths: vec![
                "Excellent quality rating".to_string(),
                "Strong compliance record".to_string(),
                "Cost-effective pricing".to_string(),
            ],
        }
    }

    fn calculate_performance_score(&self, performance: &SupplierPerformance) -> f64 {
        let delivery_score = if performance.total_orders > 0 {
            performance.on_time_deliveries as f64 / performance.total_orders as f64 * 10.0
        } else {
            5.0
        };

        let quality_score = performance.quality_rating.unwrap_or(5.0) * 2.0;
        let overall_score = performance.overall_rating.unwrap_or(5.0) * 2.0;

        // Weighted average: 40% delivery, 30% quality, 30% overall
        (delivery_score * 0.4 + quality_score * 0.3 + overall_score * 0.3).min(10.0).max(0.0)
    }

    async fn identify_suppliers_needing_attention(&self, _tenant_id: Uuid) -> Vec<SupplierSummary> {
        // Mock implementation - would query database for suppliers with:
        // - Rating below 3.0
        // - On-time delivery rate below 85%
        // - High defect rates
        // - Recent performance decline
        Vec::new()
    }

    async fn analyze_performance_trends(&self, _tenant_id: Uuid, months: i32) -> Vec<PerformanceTrend> {
        // Mock implementation - would analyze historical data
        (0..months).map(|i| PerformanceTrend {
            period: format!("2024-{:02}", (i % 12) + 1),
            average_rating: 4.0 + (i as f64 * 0.05),
            on_time_delivery_rate: 0.80 + (i as f64 * 0.01),
            total_orders: 400 + (i * 20),
            total_spend: 1000000 + (i as i64 * 50000),
        }).collect()
    }

    async fn calculate_category_distribution(&self, _tenant_id: Uuid) -> Vec<CategorySummary> {
        // Mock implementation
        vec![
            CategorySummary {
                category: SupplierCategory::Technology,
                count: 45,
                percentage: 30.0,
                average_rating: Some(4.5),
                total_spend: 2500000,
            },
            CategorySummary {
                category: SupplierCategory::Manufacturing,
                count: 35,
                percentage: 23.3,
                average_rating: Some(4.1),
                total_spend: 1800000,
            },
            CategorySummary {
                category: SupplierCategory::Services,
                count: 30,
                percentage: 20.0,
                average_rating: Some(4.3),
                total_spend: 1200000,
            },
            CategorySummary {
                category: SupplierCategory::RawMaterials,
                count: 25,
                percentage: 16.7,
                average_rating: Some(3.9),
                total_spend: 1500000,
            },
            CategorySummary {
                category: SupplierCategory::Logistics,
                count: 15,
                percentage: 10.0,
                average_rating: Some(4.0),
                total_spend: 800000,
            },
        ]
    }
}

impl Default for DefaultSupplierAnalytics {
    fn default() -> Self {
        Self::new()
    }
}