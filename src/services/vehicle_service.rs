//! Servicio del subsistema VehicleManagement
//!
//! Habla con `/transport/buses` y traduce `make` ↔ `vehicleName` en el borde,
//! de forma que el resto del código trabaja con un único modelo por recurso.

use async_trait::async_trait;

use crate::client::{ApiClient, ApiResult};
use crate::models::{Bus, Vehicle};

use super::{CrudService, ResourceApi};

#[derive(Clone)]
pub struct VehicleService {
    buses: CrudService<Bus>,
}

impl VehicleService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            buses: CrudService::new(client),
        }
    }
}

#[async_trait]
impl ResourceApi<Vehicle> for VehicleService {
    async fn get_all(&self) -> ApiResult<Vec<Vehicle>> {
        let buses = self.buses.get_all().await?;
        Ok(buses.into_iter().map(Vehicle::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> ApiResult<Option<Vehicle>> {
        Ok(self.buses.get_by_id(id).await?.map(Vehicle::from))
    }

    async fn create(&self, data: &Vehicle) -> ApiResult<Vehicle> {
        let bus = Bus::from(data.clone());
        Ok(Vehicle::from(self.buses.create(&bus).await?))
    }

    async fn update(&self, id: &str, data: &Vehicle) -> ApiResult<Vehicle> {
        let bus = Bus::from(data.clone());
        Ok(Vehicle::from(self.buses.update(id, &bus).await?))
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.buses.delete(id).await
    }
}
